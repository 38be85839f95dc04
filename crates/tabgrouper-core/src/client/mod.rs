//! Categorization oracle client.
//!
//! Sends the indexed tab list to the local relay and turns its
//! provider-native reply into an untrusted [`RawPartition`]. The reply is
//! never trusted beyond its shape; validation happens in the normalizer.

mod extract;
mod prompt;

pub use extract::{extract_json_block, extract_partition};
pub use prompt::build_prompt;

use serde_json::Value;
use tracing::{debug, warn};

use tabgrouper_protocols::{
    CategorizeError, CategorizeRequest, ChatMessage, ErrorBody, Provider, RawPartition,
    TabSnapshot,
};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Default relay endpoint.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3002/categorize";

/// HTTP client for the relay's `POST /categorize`.
#[derive(Debug, Clone)]
pub struct CategorizeClient {
    endpoint: String,
    client: reqwest::Client,
}

impl Default for CategorizeClient {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

impl CategorizeClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Validate a provider selector before any network call.
    pub fn provider(selected_api: &str) -> Result<Provider, CategorizeError> {
        selected_api
            .parse()
            .map_err(|e: tabgrouper_protocols::UnknownProvider| CategorizeError::Config(e.to_string()))
    }

    /// Submit a prompt and return the provider-native JSON body.
    pub async fn send(&self, provider: Provider, prompt: String) -> Result<Value, CategorizeError> {
        let request = CategorizeRequest {
            selected_api: provider.as_str().to_string(),
            messages: vec![ChatMessage::user(prompt)],
        };

        debug!("Posting categorize request to {} for {}", self.endpoint, provider);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| CategorizeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            warn!("Relay returned {}: {}", status.as_u16(), message);
            return Err(CategorizeError::Transport(format!(
                "Server request failed with status {}: {}",
                status.as_u16(),
                message
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CategorizeError::Transport(format!("Invalid response body: {}", e)))
    }

    /// Pull the partition out of a provider-native body.
    pub fn parse(provider: Provider, body: &Value) -> Result<RawPartition, CategorizeError> {
        let text = provider.response_text(body).ok_or_else(|| {
            CategorizeError::Extraction(format!("no {} response text in the body", provider))
        })?;
        extract_partition(text)
    }

    /// Run one full request for a snapshot.
    pub async fn categorize(
        &self,
        snapshot: &TabSnapshot,
        selected_api: &str,
    ) -> Result<RawPartition, CategorizeError> {
        let provider = Self::provider(selected_api)?;
        let body = self.send(provider, build_prompt(snapshot)).await?;
        Self::parse(provider, &body)
    }
}
