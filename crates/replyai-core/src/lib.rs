#![deny(unsafe_code)]

//! Reply suggester core.
//!
//! Provides the provider contract and its backends (Gemini, OpenRouter,
//! Qwen and a local echo), response normalization, the provider registry,
//! the personalization store, and the HTTP server that exposes them.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future, the return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits produces opaque return types that are not
/// object-safe, so traits held as `Arc<dyn Trait>` return this instead.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// HTTP API routes, CORS policy and error mapping.
pub mod api;
/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Per-user personalization records.
pub mod personalization;
/// Provider contract, backends, prompts and normalization.
pub mod provider;
/// Provider id → adapter registry with echo fallback.
pub mod registry;
/// Credential resolution and zeroization.
pub mod secrets;
/// Server runtime.
pub mod server;

pub use personalization::{InMemoryPersonalizationStore, PersonalizationStore};
pub use provider::{ProviderError, SuggestRequest, SuggestResponse, SuggestionProvider};
pub use registry::ProviderRegistry;
pub use secrets::SecretValue;
pub use server::Server;
