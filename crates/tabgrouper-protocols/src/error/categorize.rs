//! Categorization pipeline errors.

use thiserror::Error;

use super::{PartitionInvalidError, TabOracleError};

/// Every way a categorization request can fail.
///
/// All variants are fatal to the request only; the sidebar reports them and
/// leaves its current tree untouched.
#[derive(Debug, Error)]
pub enum CategorizeError {
    /// Bad provider selector or client setup, raised before any network call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP call failed or returned a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No fenced block in the categorizer's text.
    #[error("Failed to extract JSON from the response: {0}")]
    Extraction(String),

    /// The fenced block is not a decodable JSON object.
    #[error("Failed to decode JSON from the response: {0}")]
    Decode(String),

    #[error(transparent)]
    PartitionInvalid(#[from] PartitionInvalidError),

    /// The tab boundary could not produce a snapshot.
    #[error("Failed to query tabs: {0}")]
    TabQuery(#[from] TabOracleError),
}

impl CategorizeError {
    /// Stable short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CategorizeError::Config(_) => "config",
            CategorizeError::Transport(_) => "transport",
            CategorizeError::Extraction(_) => "extraction",
            CategorizeError::Decode(_) => "decode",
            CategorizeError::PartitionInvalid(_) => "partition_invalid",
            CategorizeError::TabQuery(_) => "tab_query",
        }
    }
}
