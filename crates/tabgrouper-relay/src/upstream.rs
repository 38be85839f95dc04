//! Upstream provider calls.
//!
//! Forwards the chat messages unchanged and returns the provider-native JSON
//! body untouched.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use tabgrouper_config::{Config, ProviderConfig};
use tabgrouper_protocols::{ChatMessage, Provider};

use crate::error::RelayError;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[cfg(test)]
#[path = "upstream_tests.rs"]
mod tests;

/// Anthropic Messages API body.
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI-compatible chat completions body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Client for the two upstream providers.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    config: Config,
}

impl UpstreamClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn settings(&self, provider: Provider) -> ProviderConfig {
        self.config.provider(provider)
    }

    /// Forward `messages` to `provider` and return its JSON body.
    pub async fn forward(
        &self,
        provider: Provider,
        messages: &[ChatMessage],
    ) -> Result<Value, RelayError> {
        let settings = self.settings(provider);
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(RelayError::MissingApiKey(provider))?;
        let url = settings.base_url.as_deref().unwrap_or_default();
        let model = settings.model.as_deref().unwrap_or_default();

        debug!("Sending request to {} API at {}", provider, url);
        let request = match provider {
            Provider::Anthropic => self
                .client
                .post(url)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&AnthropicRequest {
                    model,
                    max_tokens: settings.max_tokens.unwrap_or(8192),
                    messages,
                    temperature: settings.temperature,
                }),
            Provider::Groq => self
                .client
                .post(url)
                .bearer_auth(api_key)
                .header("content-type", "application/json")
                .json(&ChatCompletionRequest {
                    model,
                    messages,
                    max_tokens: settings.max_tokens,
                    temperature: settings.temperature,
                }),
        };

        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Received response from {} API with status {}", provider, status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "{} API request failed with status {}: {}",
                provider,
                status.as_u16(),
                body
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))
    }
}
