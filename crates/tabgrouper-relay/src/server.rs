//! HTTP server and routing.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use tabgrouper_protocols::{CategorizeRequest, Provider};

use crate::error::RelayError;
use crate::upstream::UpstreamClient;

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

/// Shared state for relay handlers.
pub struct RelayState {
    pub upstream: UpstreamClient,
}

/// Create the Axum router for the relay.
pub fn create_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/categorize", post(categorize))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Forward a categorization prompt to the selected provider.
async fn categorize(
    State(state): State<Arc<RelayState>>,
    payload: Result<Json<CategorizeRequest>, JsonRejection>,
) -> Result<Json<Value>, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;
    info!(
        "Received /categorize request for {} with {} messages",
        request.selected_api,
        request.messages.len()
    );

    let provider: Provider = request.selected_api.parse()?;
    match state.upstream.forward(provider, &request.messages).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            error!("Error in /categorize route: {}", e);
            Err(e)
        }
    }
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<RelayState>>) -> impl IntoResponse {
    let providers: Vec<Value> = Provider::ALL
        .iter()
        .map(|p| {
            let key_set = state
                .upstream
                .settings(*p)
                .api_key
                .is_some_and(|k| !k.is_empty());
            json!({"name": p.as_str(), "api_key": key_set})
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "providers": providers,
        })),
    )
}
