//! Tab snapshot capture.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, warn};

use tabgrouper_protocols::{ParentInfo, Tab, TabId, TabOracle, TabOracleError, TabSnapshot};

/// Capture the current window's tabs as an indexed snapshot.
///
/// Each tab's opener is resolved best-effort: first against the tabs in the
/// same query, then through [`TabOracle::get_tab`]. A failed lookup records
/// no parent and never fails the snapshot.
pub async fn capture_snapshot(oracle: &dyn TabOracle) -> Result<TabSnapshot, TabOracleError> {
    let tabs = oracle.query_tabs().await?;
    let by_id: HashMap<TabId, &Tab> = tabs.iter().map(|t| (t.id, t)).collect();

    let parents = join_all(tabs.iter().map(|tab| resolve_parent(oracle, &by_id, tab))).await;

    debug!("Captured snapshot of {} tabs", tabs.len());
    Ok(TabSnapshot::new(tabs.iter().cloned().zip(parents)))
}

async fn resolve_parent(
    oracle: &dyn TabOracle,
    by_id: &HashMap<TabId, &Tab>,
    tab: &Tab,
) -> Option<ParentInfo> {
    let opener_id = tab.opener_id?;

    if let Some(parent) = by_id.get(&opener_id) {
        return Some(ParentInfo {
            id: parent.id,
            title: parent.title.clone(),
        });
    }

    match oracle.get_tab(opener_id).await {
        Ok(parent) => Some(ParentInfo {
            id: parent.id,
            title: parent.title,
        }),
        Err(e) => {
            warn!("Error fetching parent tab for tab {}: {}", tab.id, e);
            None
        }
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
