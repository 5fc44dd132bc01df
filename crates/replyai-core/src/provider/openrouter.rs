//! OpenRouter provider.
//!
//! OpenRouter fronts many hosted models behind an OpenAI-compatible Chat
//! Completions API. Free-tier models (ids ending in `:free`) cost nothing.

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

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";

/// Estimate for paid models; free models cost nothing.
const PAID_COST_PER_REQUEST: f64 = 0.001;

pub const INFO: ProviderInfo = ProviderInfo {
    id: "openrouter",
    name: "OpenRouter AI",
    label: "OpenRouter",
    env_var: "OPENROUTER_API_KEY",
};

fn defaults() -> ProviderDefaults {
    ProviderDefaults {
        endpoint_url: OPENROUTER_API_URL,
        model_name: "qwen/qwen-2.5-14b-instruct:free",
        timeout_secs: 15,
        max_tokens_range: 1..=2000,
    }
}

/// OpenRouter provider.
pub struct OpenRouterProvider {
    client: Client,
    config: ResolvedConfig,
    env: EnvLookup,
}

impl OpenRouterProvider {
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

    fn build_request_body(&self, request: &SuggestRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model_name.clone(),
            messages: ChatMessage::pair_for(request),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

impl SuggestionProvider for OpenRouterProvider {
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
            debug!(model = %body.model, "OpenRouter chat request");

            let api_key = self
                .config
                .credential(&INFO, self.env)
                .ok_or_else(|| ProviderError::auth(INFO.id))?;

            let request = self
                .client
                .post(format!("{}/chat/completions", self.config.endpoint_url))
                .bearer_auth(api_key.expose())
                .json(&body);

            let text = http::send(request)
                .await
                .map_err(|failure| classify_failure(&INFO, failure))?;

            let completion: Option<ChatCompletionResponse> = http::decode(&INFO, &text);
            let content = completion.as_ref().and_then(ChatCompletionResponse::content);
            let suggestions = normalize(content);

            let mut metadata = self.config.base_metadata(&INFO);
            metadata.insert(
                "usage".into(),
                completion.and_then(|c| c.usage).unwrap_or_default(),
            );

            Ok(SuggestResponse::new(suggestions).with_metadata(metadata))
        })
    }

    fn estimate_cost(&self, _request: &SuggestRequest) -> f64 {
        if self.config.model_name.contains(":free") {
            0.0
        } else {
            PAID_COST_PER_REQUEST
        }
    }
}

// ── OpenAI-compatible API types ─────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl ChatCompletionResponse {
    fn content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}
