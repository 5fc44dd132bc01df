//! Local echo provider.
//!
//! Needs no credentials and makes no network calls: each requested mode
//! turns the context into one canned reply. The registry hands this out for
//! any provider id it does not know, which keeps local development working
//! without API keys.

use crate::BoxFuture;

use super::error::ProviderError;
use super::normalize::fit;
use super::provider::{ProviderInfo, SuggestionProvider};
use super::types::{Metadata, SuggestRequest, SuggestResponse};

pub const INFO: ProviderInfo = ProviderInfo {
    id: "echo",
    name: "Local Echo",
    label: "Echo",
    env_var: "",
};

/// Deterministic, zero-cost provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }

    /// One reply per mode, before fitting to three.
    pub fn replies(request: &SuggestRequest) -> Vec<String> {
        let base = request.context.trim();
        let suffix = intensity_suffix(request.intensity);
        request
            .modes
            .iter()
            .map(|mode| match mode.to_lowercase().as_str() {
                "casual" => format!("{base} — sounds good to me{suffix}"),
                "formal" => format!("{base}. I will proceed as discussed{suffix}"),
                "witty" => format!("{base} — because why not, right?{suffix}"),
                other => format!("{base} ({other}){suffix}"),
            })
            .collect()
    }
}

/// Higher intensity, louder punctuation.
fn intensity_suffix(intensity: i32) -> &'static str {
    match intensity {
        i32::MIN..=3 => "",
        4..=6 => "!",
        7..=9 => "!! 😄",
        _ => "!!! 🔥",
    }
}

impl SuggestionProvider for EchoProvider {
    fn id(&self) -> &str {
        INFO.id
    }

    fn name(&self) -> &str {
        INFO.name
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn generate(
        &self,
        request: &SuggestRequest,
    ) -> BoxFuture<'_, Result<SuggestResponse, ProviderError>> {
        let suggestions = fit(Self::replies(request));
        Box::pin(async move {
            let mut metadata = Metadata::new();
            metadata.insert("provider".into(), INFO.id.into());
            Ok(SuggestResponse::new(suggestions).with_metadata(metadata))
        })
    }

    fn estimate_cost(&self, _request: &SuggestRequest) -> f64 {
        0.0
    }
}
