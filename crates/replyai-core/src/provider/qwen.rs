//! Alibaba Cloud Qwen provider, via the DashScope text-generation API.
//!
//! Requests carry chat messages under `input` and sampling settings under
//! `parameters`. With `result_format = "message"` the reply arrives in
//! `output.choices[0].message.content`; older models answer with a bare
//! `output.text`, which is accepted too.

use replyai_config::ProviderConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::BoxFuture;
use crate::secrets::{EnvLookup, process_env};

use super::error::{ProviderError, classify_failure};
use super::http;
use super::normalize::normalize;
use super::provider::{ProviderDefaults, ProviderInfo, ResolvedConfig, SuggestionProvider};
use super::types::{ChatMessage, SuggestRequest, SuggestResponse};

const DASHSCOPE_API_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
const GENERATION_PATH: &str = "services/aigc/text-generation/generation";

/// Rough per-request cost for qwen-turbo.
const COST_PER_REQUEST: f64 = 0.0003;

pub const INFO: ProviderInfo = ProviderInfo {
    id: "qwen",
    name: "Alibaba Cloud Qwen",
    label: "Qwen",
    env_var: "DASHSCOPE_API_KEY",
};

fn defaults() -> ProviderDefaults {
    ProviderDefaults {
        endpoint_url: DASHSCOPE_API_URL,
        model_name: "qwen-turbo",
        timeout_secs: 15,
        max_tokens_range: 1..=2000,
    }
}

/// Qwen provider.
pub struct QwenProvider {
    client: Client,
    config: ResolvedConfig,
    env: EnvLookup,
}

impl QwenProvider {
    /// Create a provider, reading the fallback credential from the process
    /// environment. Fails if the configuration is invalid.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_env(config, process_env)
    }

    /// Create a provider with an explicit environment lookup.
    pub fn with_env(config: &ProviderConfig, env: EnvLookup) -> Result<Self, ProviderError> {
        let config = ResolvedConfig::resolve(config, &defaults());
        config.validate(&INFO, env)?;
        Ok(Self {
            client: http::build_client(&INFO, config.timeout)?,
            config,
            env,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model_name
    }

    fn build_request_body(&self, request: &SuggestRequest) -> GenerationRequest {
        GenerationRequest {
            model: self.config.model_name.clone(),
            input: GenerationInput {
                messages: ChatMessage::pair_for(request),
            },
            parameters: GenerationParameters {
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
                result_format: "message".to_string(),
            },
        }
    }
}

impl SuggestionProvider for QwenProvider {
    fn id(&self) -> &str {
        INFO.id
    }

    fn name(&self) -> &str {
        INFO.name
    }

    fn validate_config(&self) -> Result<(), ProviderError> {
        self.config.validate(&INFO, self.env)
    }

    fn generate(
        &self,
        request: &SuggestRequest,
    ) -> BoxFuture<'_, Result<SuggestResponse, ProviderError>> {
        let body = self.build_request_body(request);
        Box::pin(async move {
            debug!(model = %body.model, "DashScope generation request");

            let api_key = self
                .config
                .credential(&INFO, self.env)
                .ok_or_else(|| ProviderError::auth(INFO.id))?;

            let request = self
                .client
                .post(format!("{}/{GENERATION_PATH}", self.config.endpoint_url))
                .bearer_auth(api_key.expose())
                .json(&body);

            let text = http::send(request)
                .await
                .map_err(|failure| classify_failure(&INFO, failure))?;

            let generation: Option<GenerationResponse> = http::decode(&INFO, &text);
            let content = generation.as_ref().and_then(GenerationResponse::content);
            let suggestions = normalize(content);

            let mut metadata = self.config.base_metadata(&INFO);
            metadata.insert(
                "usage".into(),
                generation.and_then(|g| g.usage).unwrap_or_default(),
            );

            Ok(SuggestResponse::new(suggestions).with_metadata(metadata))
        })
    }

    fn estimate_cost(&self, _request: &SuggestRequest) -> f64 {
        COST_PER_REQUEST
    }
}

// ── DashScope API types ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerationRequest {
    model: String,
    input: GenerationInput,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationInput {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f64,
    max_tokens: u32,
    result_format: String,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    output: Option<GenerationOutput>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    choices: Vec<GenerationChoice>,
}

#[derive(Debug, Deserialize)]
struct GenerationChoice {
    message: ChatMessage,
}

impl GenerationResponse {
    fn content(&self) -> Option<&str> {
        let output = self.output.as_ref()?;
        output.text.as_deref().or_else(|| {
            output
                .choices
                .first()
                .and_then(|c| c.message.content.as_deref())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn dashscope_env(key: &str) -> Option<String> {
        (key == "DASHSCOPE_API_KEY").then(|| "sk-dashscope".to_string())
    }

    #[test]
    fn test_defaults() {
        let provider = QwenProvider::with_env(&ProviderConfig::default(), dashscope_env).unwrap();
        assert_eq!(provider.model(), "qwen-turbo");
        assert_eq!(provider.config.temperature, 0.7);
        assert_eq!(provider.config.max_tokens, 150);
        assert_eq!(provider.name(), "Alibaba Cloud Qwen");
    }

    #[test]
    fn test_no_credential_fails_construction() {
        let err = QwenProvider::with_env(&ProviderConfig::default(), no_env)
            .err()
            .unwrap();
        assert_eq!(
            err.message(),
            "DASHSCOPE_API_KEY must be provided via config or environment"
        );
    }

    #[test]
    fn test_invalid_max_tokens() {
        let config = ProviderConfig {
            max_tokens: Some(3000),
            ..ProviderConfig::with_api_key("k")
        };
        let err = QwenProvider::with_env(&config, no_env).err().unwrap();
        assert_eq!(err.message(), "Max tokens must be between 1 and 2000");
    }

    #[test]
    fn test_cost_estimate() {
        let provider = QwenProvider::with_env(&ProviderConfig::with_api_key("k"), no_env).unwrap();
        assert_eq!(provider.estimate_cost(&SuggestRequest::new("u", "hi")), 0.0003);
    }

    #[test]
    fn test_build_request_body() {
        let provider = QwenProvider::with_env(&ProviderConfig::with_api_key("k"), no_env).unwrap();
        let body = provider.build_request_body(&SuggestRequest::new("u", "On my way"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "qwen-turbo");
        assert_eq!(json["input"]["messages"][0]["role"], "system");
        assert_eq!(json["parameters"]["result_format"], "message");
        assert_eq!(json["parameters"]["max_tokens"], 150);
    }

    #[test]
    fn test_content_from_text_or_choices() {
        let text: GenerationResponse =
            serde_json::from_str(r#"{"output":{"text":"Hello there, friend!"}}"#).unwrap();
        assert_eq!(text.content(), Some("Hello there, friend!"));

        let message: GenerationResponse = serde_json::from_str(
            r#"{"output":{"choices":[{"message":{"role":"assistant","content":"Hi!"}}]}}"#,
        )
        .unwrap();
        assert_eq!(message.content(), Some("Hi!"));

        let nothing: GenerationResponse = serde_json::from_str(r#"{"request_id":"x"}"#).unwrap();
        assert_eq!(nothing.content(), None);
    }
}
