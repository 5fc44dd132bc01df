//! CORS policy built from the `[cors]` config section.

use axum::http::HeaderValue;
use replyai_config::CorsConfig;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Build the CORS layer for the API router.
///
/// A `"*"` entry admits any origin, and then credentials are never allowed.
/// Otherwise only the listed origins are admitted; with credentials on,
/// requested methods and headers are mirrored back.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.origins.iter().any(|o| o.trim() == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_origin(AllowOrigin::list(origins));
    if config.allow_credentials {
        layer
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
    } else {
        layer.allow_methods(Any).allow_headers(Any)
    }
}
