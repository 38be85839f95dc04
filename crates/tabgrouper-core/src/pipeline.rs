//! Categorization pipeline: snapshot, request, normalize.

use std::sync::Arc;

use tracing::{info, warn};

use tabgrouper_protocols::{CategorizeError, TabOracle, TabSnapshot};

use crate::client::{build_prompt, CategorizeClient};
use crate::event_relay::EventRelay;
use crate::normalizer::{normalize, CanonicalGrouping};
use crate::snapshot::capture_snapshot;

pub const STATUS_CATEGORIZING: &str = "Categorizing tabs...";
pub const STATUS_SENDING: &str = "Sending request to local server...";
pub const STATUS_PROCESSING: &str = "Processing server response...";
pub const STATUS_CREATING: &str = "Creating tab groups...";

/// One categorization run from tab query to canonical grouping.
///
/// The pipeline never touches the tree; its result is delivered to the
/// sidebar as a message.
#[derive(Clone)]
pub struct CategorizationPipeline {
    oracle: Arc<dyn TabOracle>,
    client: CategorizeClient,
}

impl CategorizationPipeline {
    pub fn new(oracle: Arc<dyn TabOracle>, client: CategorizeClient) -> Self {
        Self { oracle, client }
    }

    /// Run the pipeline, reporting progress through `relay`.
    pub async fn run(
        &self,
        selected_api: &str,
        relay: &EventRelay,
    ) -> Result<(CanonicalGrouping, TabSnapshot), CategorizeError> {
        relay.status(STATUS_CATEGORIZING);
        let provider = CategorizeClient::provider(selected_api)?;

        let snapshot = capture_snapshot(self.oracle.as_ref()).await?;
        info!("Categorizing {} tabs with {}", snapshot.len(), provider);

        relay.status(STATUS_SENDING);
        let body = self.client.send(provider, build_prompt(&snapshot)).await?;

        relay.status(STATUS_PROCESSING);
        let raw = CategorizeClient::parse(provider, &body)?;
        let grouping = normalize(&raw, snapshot.len())?;

        relay.status(STATUS_CREATING);
        info!(
            "Categorized {} tabs into {} groups",
            snapshot.len(),
            grouping.len()
        );
        Ok((grouping, snapshot))
    }

    /// Run the pipeline and finish with exactly one terminal message.
    pub async fn run_and_report(&self, selected_api: &str, relay: &EventRelay) {
        match self.run(selected_api, relay).await {
            Ok((grouping, snapshot)) => relay.output(grouping, snapshot.into_tabs()),
            Err(e) => {
                warn!("Categorization failed ({}): {}", e.kind(), e);
                relay.error(format!("Failed to categorize tabs: {}", e));
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
