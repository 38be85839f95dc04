//! Configuration schema definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabgrouper_protocols::Provider;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub client: ClientConfig,

    /// Upstream provider settings keyed by selector (`anthropic`, `groq`).
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Settings for one provider, falling back to built-in defaults.
    pub fn provider(&self, provider: Provider) -> ProviderConfig {
        let defaults = ProviderConfig::defaults_for(provider);
        match self.providers.get(provider.as_str()) {
            Some(configured) => configured.clone().or(defaults),
            None => defaults,
        }
    }
}

/// Relay server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3002
}

/// Sidebar client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    #[serde(default = "default_api")]
    pub default_api: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            default_api: default_api(),
        }
    }
}

fn default_relay_url() -> String {
    "http://localhost:3002/categorize".to_string()
}

fn default_api() -> String {
    "anthropic".to_string()
}

/// Upstream provider configuration. Unset fields take the provider's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderConfig {
    /// Built-in defaults for a provider. The API key comes from the environment.
    pub fn defaults_for(provider: Provider) -> Self {
        match provider {
            Provider::Anthropic => Self {
                api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
                base_url: Some("https://api.anthropic.com/v1/messages".to_string()),
                model: Some("claude-3-5-sonnet-20240620".to_string()),
                max_tokens: Some(8192),
                temperature: Some(0.5),
            },
            Provider::Groq => Self {
                api_key: std::env::var("GROQ_API_KEY").ok(),
                base_url: Some("https://api.groq.com/openai/v1/chat/completions".to_string()),
                model: Some("llama-3.1-8b-instant".to_string()),
                max_tokens: None,
                temperature: Some(0.5),
            },
        }
    }

    /// Fill unset fields from `other`.
    pub fn or(self, other: ProviderConfig) -> Self {
        Self {
            api_key: self.api_key.or(other.api_key),
            base_url: self.base_url.or(other.base_url),
            model: self.model.or(other.model),
            max_tokens: self.max_tokens.or(other.max_tokens),
            temperature: self.temperature.or(other.temperature),
        }
    }
}
