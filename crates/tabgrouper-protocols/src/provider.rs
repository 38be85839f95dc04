//! Categorization providers and the relay wire format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upstream model providers the relay can forward to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    Groq,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Anthropic, Provider::Groq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::Groq => "groq",
        }
    }

    /// Pull the model's free text out of the provider-native response body.
    ///
    /// Anthropic puts it at `content[0].text`, Groq at `choices[0].message.content`.
    pub fn response_text<'a>(&self, body: &'a Value) -> Option<&'a str> {
        match self {
            Provider::Anthropic => body["content"][0]["text"].as_str(),
            Provider::Groq => body["choices"][0]["message"]["content"].as_str(),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a provider selector outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid API selected: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anthropic" => Ok(Provider::Anthropic),
            "groq" => Ok(Provider::Groq),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// A chat message forwarded to the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /categorize`.
///
/// The selector stays a plain string so the relay can reject unknown values
/// with a proper error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    #[serde(rename = "selectedAPI")]
    pub selected_api: String,
    pub messages: Vec<ChatMessage>,
}

/// Failure body returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
