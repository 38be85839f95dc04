//! # TabGrouper Relay
//!
//! Local HTTP relay between the sidebar and the upstream model providers.
//!
//! - `POST /categorize` takes `{selectedAPI, messages}` and returns the
//!   provider-native JSON body, or `{error}` on failure.
//! - `GET /health` reports liveness and which providers have a key.

pub mod error;
pub mod server;
pub mod upstream;

pub use error::RelayError;
pub use server::{create_router, RelayState};
pub use upstream::UpstreamClient;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use tabgrouper_config::Config;

/// The relay server.
pub struct RelayServer {
    host: String,
    port: u16,
    state: Arc<RelayState>,
}

impl RelayServer {
    pub fn new(config: Config) -> Self {
        Self {
            host: config.relay.host.clone(),
            port: config.relay.port,
            state: Arc::new(RelayState {
                upstream: UpstreamClient::new(config),
            }),
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn router(&self) -> Router {
        create_router(Arc::clone(&self.state))
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn run(self) -> Result<(), RelayError> {
        let listener = TcpListener::bind(self.addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), RelayError> {
        let addr = listener.local_addr()?;
        info!("Server running at http://{}", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
