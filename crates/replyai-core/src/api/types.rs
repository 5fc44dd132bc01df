//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::SuggestRequest;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git_hash: String,
}

/// Body of `POST /suggest`: a suggestion request plus an optional
/// provider override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestBody {
    #[serde(flatten)]
    pub request: SuggestRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// One row of the provider listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderSummary>,
    pub default_provider: String,
}

/// Plain acknowledgement, optionally with a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }
}

/// Body of `POST /upload_personalization`. Both fields are optional on the
/// wire so a missing one can be reported as a 400 rather than a 422.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadPersonalizationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub artifacts: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePersonalizationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePersonalizationResponse {
    pub status: String,
    pub deleted: bool,
}

/// Error body. `provider` and `retryable` are present for provider failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}
