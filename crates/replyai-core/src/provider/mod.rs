//! Suggestion providers: one contract, several backends.
//!
//! Every backend sits behind the [`SuggestionProvider`] trait. Currently
//! supported:
//!
//! - **Gemini**: Google's Generative Language API (free-text prompt)
//! - **OpenRouter**: OpenAI-compatible Chat Completions
//! - **Qwen**: Alibaba Cloud DashScope text generation
//! - **Echo**: local, credential-free fallback
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────┐
//! │ HTTP handler │────▶│ SuggestionProvider │  (trait)
//! └──────────────┘     └─────────┬──────────┘
//!                                │
//!         ┌──────────────┬───────┴──────┬──────────────┐
//!         ▼              ▼              ▼              ▼
//!    ┌─────────┐   ┌────────────┐  ┌─────────┐   ┌──────────┐
//!    │ Gemini  │   │ OpenRouter │  │  Qwen   │   │   Echo   │
//!    └─────────┘   └────────────┘  └─────────┘   └──────────┘
//! ```
//!
//! Whatever a backend returns is passed through [`normalize`] so callers
//! always see exactly three suggestions.

pub mod echo;
pub mod error;
pub mod gemini;
pub(crate) mod http;
pub mod normalize;
pub mod openrouter;
pub mod prompt;
#[allow(clippy::module_inception)]
pub mod provider;
pub mod qwen;
pub mod types;
pub mod worker;

use replyai_config::ProviderConfig;

use crate::secrets::EnvLookup;

pub use echo::EchoProvider;
pub use error::{ProviderError, RawFailure, classify_failure};
pub use gemini::GeminiProvider;
pub use normalize::{DEFAULT_SUGGESTIONS, SUGGESTION_COUNT, normalize};
pub use openrouter::OpenRouterProvider;
pub use provider::{ProviderInfo, SuggestionProvider};
pub use qwen::QwenProvider;
pub use types::{ChatMessage, Metadata, SuggestRequest, SuggestResponse};

/// Ids of the network-backed providers, in registration order.
pub const NETWORK_PROVIDERS: [&str; 3] = [gemini::INFO.id, openrouter::INFO.id, qwen::INFO.id];

/// Construct the network-backed provider registered under `id`.
///
/// Returns `None` for ids no adapter answers to; otherwise the adapter's
/// own construction result, which fails on invalid configuration.
pub fn create_provider(
    id: &str,
    config: &ProviderConfig,
    env: EnvLookup,
) -> Option<Result<Box<dyn SuggestionProvider>, ProviderError>> {
    fn boxed<P: SuggestionProvider + 'static>(
        result: Result<P, ProviderError>,
    ) -> Result<Box<dyn SuggestionProvider>, ProviderError> {
        result.map(|p| Box::new(p) as Box<dyn SuggestionProvider>)
    }

    match id {
        "gemini" => Some(boxed(GeminiProvider::with_env(config, env))),
        "openrouter" => Some(boxed(OpenRouterProvider::with_env(config, env))),
        "qwen" => Some(boxed(QwenProvider::with_env(config, env))),
        _ => None,
    }
}
