//! Tab and snapshot types.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "tab_tests.rs"]
mod tests;

/// Browser-assigned tab identifier, stable for the tab's lifetime.
pub type TabId = u64;

/// A transient copy of one browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "favIconUrl", alias = "favicon", skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, rename = "openerTabId", alias = "openerId", skip_serializing_if = "Option::is_none")]
    pub opener_id: Option<TabId>,
}

impl Tab {
    /// Create a tab with an id, title and url.
    pub fn new(id: TabId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            favicon: None,
            opener_id: None,
        }
    }

    /// Set the favicon URL.
    pub fn with_favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }

    /// Set the opener tab id.
    pub fn with_opener(mut self, opener_id: TabId) -> Self {
        self.opener_id = Some(opener_id);
        self
    }
}

/// The resolved opener of a snapshot tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentInfo {
    pub id: TabId,
    pub title: String,
}

/// One tab inside a [`TabSnapshot`], addressed by its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub index: usize,
    pub tab: Tab,
    pub parent: Option<ParentInfo>,
}

/// An ordered, indexed capture of the current tab set.
///
/// Indices are `0..len()` in capture order and are only meaningful relative
/// to the snapshot that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl TabSnapshot {
    /// Build a snapshot, assigning indices in the order given.
    pub fn new(tabs: impl IntoIterator<Item = (Tab, Option<ParentInfo>)>) -> Self {
        let entries = tabs
            .into_iter()
            .enumerate()
            .map(|(index, (tab, parent))| SnapshotEntry { index, tab, parent })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by snapshot index.
    pub fn get(&self, index: usize) -> Option<&SnapshotEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Consume the snapshot, returning the tabs in index order.
    pub fn into_tabs(self) -> Vec<Tab> {
        self.entries.into_iter().map(|e| e.tab).collect()
    }
}
