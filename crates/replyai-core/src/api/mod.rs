//! HTTP API: axum router over TCP.
//!
//! Exposes suggestion generation, the provider listing and the
//! personalization store to clients such as the browser extension.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐       HTTP/1.1 + JSON      ┌──────────────┐
//! │  Client  │───────────────────────────▶│  API Router  │
//! └──────────┘                            │   (axum)     │
//!                                         └──────┬───────┘
//!                                    ┌───────────┴───────────┐
//!                             ┌──────▼───────┐      ┌────────▼────────┐
//!                             │   Provider   │      │ Personalization │
//!                             │   Registry   │      │      Store      │
//!                             └──────────────┘      └─────────────────┘
//! ```

pub mod cors;
pub mod error;
pub mod routes;
pub mod types;

pub use cors::cors_layer;
pub use error::ApiError;
pub use routes::{ApiState, router, serve};
pub use types::*;
