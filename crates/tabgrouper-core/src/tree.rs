//! Group/tab tree reconciler.
//!
//! [`TabTree`] is the live sidebar state. It is mutated only through the
//! operations below; each one either applies fully or is a no-op. Events about
//! tabs the tree does not know are expected (a tab can be closed while its
//! events are in flight) and are ignored rather than reported.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use tabgrouper_protocols::{OpenerRef, Tab, TabId};

use crate::normalizer::CanonicalGrouping;

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;

/// Name of the fallback group.
pub const UNSORTED_GROUP: &str = "Unsorted";

/// Lifecycle of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    /// Session start, nothing loaded.
    Empty,
    /// All tabs in the fallback group.
    Unsorted,
    /// A canonical grouping has been applied.
    Categorized,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Grouping covers {expected} tabs but {actual} snapshot tabs were supplied")]
    SnapshotMismatch { expected: usize, actual: usize },
}

/// A tab row in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabNode {
    tab_id: TabId,
    title: String,
    favicon: Option<String>,
    active: bool,
}

impl TabNode {
    fn from_tab(tab: &Tab) -> Self {
        Self {
            tab_id: tab.id,
            title: tab.title.clone(),
            favicon: tab.favicon.clone(),
            active: false,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn favicon(&self) -> Option<&str> {
        self.favicon.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// A labeled, collapsible group of tab rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    name: String,
    tabs: Vec<TabNode>,
    collapsed: bool,
}

impl GroupNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tabs: Vec::new(),
            collapsed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tabs(&self) -> &[TabNode] {
        &self.tabs
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.tab_id).collect()
    }

    fn position_of(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.tab_id == tab_id)
    }
}

/// The sidebar's group/tab tree.
#[derive(Debug, Clone)]
pub struct TabTree {
    groups: Vec<GroupNode>,
    state: TreeState,
}

impl Default for TabTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TabTree {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            state: TreeState::Empty,
        }
    }

    pub fn state(&self) -> TreeState {
        self.state
    }

    pub fn groups(&self) -> &[GroupNode] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&GroupNode> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Total number of tab rows.
    pub fn tab_count(&self) -> usize {
        self.groups.iter().map(|g| g.tabs.len()).sum()
    }

    /// Group name and position of a tab row.
    pub fn locate(&self, tab_id: TabId) -> Option<(&str, usize)> {
        self.groups
            .iter()
            .find_map(|g| g.position_of(tab_id).map(|pos| (g.name.as_str(), pos)))
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&TabNode> {
        self.groups
            .iter()
            .flat_map(|g| g.tabs.iter())
            .find(|t| t.tab_id == tab_id)
    }

    /// The tab currently marked active, if any.
    pub fn active_tab(&self) -> Option<TabId> {
        self.groups
            .iter()
            .flat_map(|g| g.tabs.iter())
            .find(|t| t.active)
            .map(|t| t.tab_id)
    }

    /// Show every tab in a single fallback group, in the given order.
    pub fn initialize(&mut self, tabs: &[Tab]) {
        let mut unsorted = GroupNode::new(UNSORTED_GROUP);
        unsorted.tabs = tabs.iter().map(TabNode::from_tab).collect();
        self.groups = vec![unsorted];
        self.state = TreeState::Unsorted;
        debug!("Tree initialized with {} unsorted tabs", tabs.len());
    }

    /// Replace the whole tree with a canonical grouping.
    ///
    /// `tabs_by_index` must be the tabs of the snapshot the grouping was
    /// validated against. Changes made since that snapshot are discarded.
    pub fn apply_grouping(
        &mut self,
        grouping: CanonicalGrouping,
        tabs_by_index: &[Tab],
    ) -> Result<(), TreeError> {
        if grouping.tab_count() != tabs_by_index.len() {
            return Err(TreeError::SnapshotMismatch {
                expected: grouping.tab_count(),
                actual: tabs_by_index.len(),
            });
        }

        self.groups = grouping
            .groups()
            .iter()
            .map(|group| GroupNode {
                name: group.name().to_string(),
                tabs: group
                    .tab_indices()
                    .iter()
                    .map(|&i| TabNode::from_tab(&tabs_by_index[i]))
                    .collect(),
                collapsed: false,
            })
            .collect();
        self.state = TreeState::Categorized;
        debug!("Applied grouping with {} groups", self.groups.len());
        Ok(())
    }

    /// Place a newly created tab next to its opener, or in the fallback group.
    ///
    /// Returns the destination group name, or `None` if the tab was already
    /// tracked.
    pub fn on_tab_created(
        &mut self,
        tab: &Tab,
        opener: Option<&OpenerRef>,
        has_parent: bool,
    ) -> Option<String> {
        if self.locate(tab.id).is_some() {
            debug!("Tab {} already tracked, ignoring create", tab.id);
            return None;
        }

        let opener_id = opener.map(OpenerRef::id).or(tab.opener_id);
        let parent_group = if has_parent {
            opener_id.and_then(|id| self.groups.iter().position(|g| g.position_of(id).is_some()))
        } else {
            None
        };

        let slot = match parent_group {
            Some(slot) => slot,
            None => self.unsorted_slot(),
        };

        let group = &mut self.groups[slot];
        group.tabs.push(TabNode::from_tab(tab));
        if self.state == TreeState::Empty {
            self.state = TreeState::Unsorted;
        }

        let name = self.groups[slot].name.clone();
        debug!("Tab {} created in group '{}'", tab.id, name);
        Some(name)
    }

    /// Mark exactly one tab active. Unknown ids leave the tree unchanged.
    pub fn on_tab_activated(&mut self, tab_id: TabId) -> bool {
        if self.locate(tab_id).is_none() {
            return false;
        }
        for node in self.groups.iter_mut().flat_map(|g| g.tabs.iter_mut()) {
            node.active = node.tab_id == tab_id;
        }
        true
    }

    /// Remove a tab row. Emptied groups are kept.
    pub fn on_tab_removed(&mut self, tab_id: TabId) -> bool {
        for group in &mut self.groups {
            if let Some(pos) = group.position_of(tab_id) {
                group.tabs.remove(pos);
                return true;
            }
        }
        false
    }

    /// Patch the provided fields of a tab row.
    pub fn on_tab_updated(
        &mut self,
        tab_id: TabId,
        title: Option<&str>,
        favicon: Option<&str>,
    ) -> bool {
        let Some(node) = self
            .groups
            .iter_mut()
            .flat_map(|g| g.tabs.iter_mut())
            .find(|t| t.tab_id == tab_id)
        else {
            return false;
        };

        if let Some(title) = title {
            node.title = title.to_string();
        }
        if let Some(favicon) = favicon {
            node.favicon = Some(favicon.to_string());
        }
        true
    }

    /// Move a tab row to `position` in `destination`.
    ///
    /// Positions past the end append. Repeating the same move leaves the tree
    /// as the first move did.
    pub fn move_tab(&mut self, tab_id: TabId, destination: &str, position: usize) -> bool {
        let Some(dest) = self.groups.iter().position(|g| g.name == destination) else {
            return false;
        };
        let Some((source, from)) = self
            .groups
            .iter()
            .enumerate()
            .find_map(|(i, g)| g.position_of(tab_id).map(|pos| (i, pos)))
        else {
            return false;
        };

        let node = self.groups[source].tabs.remove(from);
        let tabs = &mut self.groups[dest].tabs;
        let at = position.min(tabs.len());
        tabs.insert(at, node);
        debug!("Moved tab {} to '{}' at {}", tab_id, destination, at);
        true
    }

    /// Flip a group's collapsed flag.
    pub fn toggle_group(&mut self, name: &str) -> bool {
        match self.groups.iter_mut().find(|g| g.name == name) {
            Some(group) => {
                group.collapsed = !group.collapsed;
                true
            }
            None => false,
        }
    }

    /// Index of the fallback group, inserting it at the top if absent.
    fn unsorted_slot(&mut self) -> usize {
        match self.groups.iter().position(|g| g.name == UNSORTED_GROUP) {
            Some(slot) => slot,
            None => {
                self.groups.insert(0, GroupNode::new(UNSORTED_GROUP));
                0
            }
        }
    }
}

impl fmt::Display for TabTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            let marker = if group.collapsed { "+" } else { "-" };
            writeln!(f, "[{}] {} ({})", marker, group.name, group.tabs.len())?;
            if group.collapsed {
                continue;
            }
            for tab in &group.tabs {
                let active = if tab.active { "*" } else { " " };
                writeln!(f, "  {} {:>6}  {}", active, tab.tab_id, tab.title)?;
            }
        }
        Ok(())
    }
}
