//! Mapping of request and provider failures onto HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::types::ErrorResponse;
use crate::provider::ProviderError;

/// Errors returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Provider(e) => provider_status(e),
        }
    }
}

/// Status code for a provider failure.
pub fn provider_status(err: &ProviderError) -> StatusCode {
    match err {
        ProviderError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        ProviderError::Auth { .. } => StatusCode::BAD_GATEWAY,
        ProviderError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        ProviderError::Generation { retryable: true, .. } => StatusCode::SERVICE_UNAVAILABLE,
        ProviderError::Generation { retryable: false, .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::BadRequest(error) => (
                status,
                Json(ErrorResponse {
                    error,
                    provider: None,
                    retryable: None,
                }),
            )
                .into_response(),
            Self::Provider(err) => {
                let body = ErrorResponse {
                    error: err.message().to_string(),
                    provider: Some(err.provider().to_string()),
                    retryable: Some(err.retryable()),
                };
                let mut response = (status, Json(body)).into_response();
                if let Some(secs) = err.retry_after_secs() {
                    response
                        .headers_mut()
                        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                }
                response
            }
        }
    }
}
