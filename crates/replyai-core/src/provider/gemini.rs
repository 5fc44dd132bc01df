//! Google Gemini provider.
//!
//! Talks to the Generative Language API through [`GeminiClient`], a small
//! SDK-style client exposing `generate_content`. Calls are hosted on a
//! worker task via [`run_on_worker`] and bounded by the configured timeout.
//! Gemini gets a single free-text prompt rather than chat messages.

use replyai_config::ProviderConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::BoxFuture;
use crate::secrets::{EnvLookup, SecretValue, process_env};

use super::error::{ProviderError, RawFailure, classify_failure};
use super::http;
use super::normalize::normalize;
use super::prompt;
use super::provider::{ProviderDefaults, ProviderInfo, ResolvedConfig, SuggestionProvider};
use super::types::{SuggestRequest, SuggestResponse};
use super::worker::run_on_worker;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Rough per-request cost for Gemini 1.5 Flash.
const COST_PER_REQUEST: f64 = 0.0004;

pub const INFO: ProviderInfo = ProviderInfo {
    id: "gemini",
    name: "Google Gemini",
    label: "Gemini",
    env_var: "GEMINI_API_KEY",
};

fn defaults() -> ProviderDefaults {
    ProviderDefaults {
        endpoint_url: GEMINI_API_URL,
        model_name: "gemini-1.5-flash",
        timeout_secs: 10,
        max_tokens_range: 1..=8192,
    }
}

/// Google Gemini provider.
pub struct GeminiProvider {
    config: ResolvedConfig,
    env: EnvLookup,
    client: GeminiClient,
}

impl GeminiProvider {
    /// Create a provider, reading the fallback credential from the process
    /// environment. Fails if the configuration is invalid.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_env(config, process_env)
    }

    /// Create a provider with an explicit environment lookup.
    pub fn with_env(config: &ProviderConfig, env: EnvLookup) -> Result<Self, ProviderError> {
        let config = ResolvedConfig::resolve(config, &defaults());
        config.validate(&INFO, env)?;

        let api_key = config
            .credential(&INFO, env)
            .ok_or_else(|| {
                ProviderError::config(
                    INFO.id,
                    format!("{} must be provided via config or environment", INFO.env_var),
                )
            })?;
        let client = GeminiClient {
            http: http::build_client(&INFO, config.timeout)?,
            base_url: config.endpoint_url.clone(),
            model: config.model_name.clone(),
            api_key,
        };

        Ok(Self {
            config,
            env,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model_name
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_tokens,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

impl SuggestionProvider for GeminiProvider {
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
        let prompt = prompt::completion_prompt(request);
        let generation_config = self.generation_config();
        let client = self.client.clone();

        Box::pin(async move {
            debug!(model = %self.config.model_name, "Gemini generate request");

            let call = async move { client.generate_content(prompt, generation_config).await };
            let response = run_on_worker(self.config.timeout, call)
                .await
                .unwrap_or_else(|e| Err(RawFailure::new(e.to_string())))
                .map_err(|failure| classify_failure(&INFO, failure))?;

            let suggestions = normalize(response.text().as_deref());

            let usage = response.usage_metadata.unwrap_or_default();
            let mut metadata = self.config.base_metadata(&INFO);
            metadata.insert("prompt_tokens".into(), usage.prompt_token_count.into());
            metadata.insert("response_tokens".into(), usage.candidates_token_count.into());

            Ok(SuggestResponse::new(suggestions).with_metadata(metadata))
        })
    }

    fn estimate_cost(&self, _request: &SuggestRequest) -> f64 {
        COST_PER_REQUEST
    }
}

/// Minimal SDK-style client for `models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: SecretValue,
}

impl GeminiClient {
    /// Generate content for a single user prompt.
    ///
    /// A body that does not decode yields an empty response, which the
    /// caller turns into default suggestions.
    pub async fn generate_content(
        &self,
        prompt: String,
        generation_config: GenerationConfig,
    ) -> Result<GenerateContentResponse, RawFailure> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config,
        };

        let request = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&body);

        let text = http::send(request).await?;
        Ok(http::decode(&INFO, &text).unwrap_or_default())
    }
}

// ── Gemini API types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Response of `generateContent`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!texts.is_empty()).then(|| texts.concat())
    }
}
