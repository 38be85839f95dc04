//! Relay error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use tabgrouper_protocols::{ErrorBody, Provider, UnknownProvider};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    InvalidApi(#[from] UnknownProvider),

    /// The request body is not a categorize request.
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("No API key configured for {0}")]
    MissingApiKey(Provider),

    /// Upstream answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidApi(_) | RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
