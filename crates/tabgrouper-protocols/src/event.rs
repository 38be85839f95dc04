//! Tab lifecycle events emitted by the browser boundary.

use serde::{Deserialize, Serialize};

use crate::tab::{Tab, TabId};

/// The opener of a newly created tab, as supplied by the boundary.
///
/// Some boundaries resolve the opener to a full tab, others only pass the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenerRef {
    Tab(Tab),
    Id(TabId),
}

impl OpenerRef {
    pub fn id(&self) -> TabId {
        match self {
            OpenerRef::Tab(tab) => tab.id,
            OpenerRef::Id(id) => *id,
        }
    }
}

impl From<TabId> for OpenerRef {
    fn from(id: TabId) -> Self {
        OpenerRef::Id(id)
    }
}

impl From<Tab> for OpenerRef {
    fn from(tab: Tab) -> Self {
        OpenerRef::Tab(tab)
    }
}

/// A tab lifecycle event.
///
/// Events for the same tab id arrive in emission order:
/// created, updated*, activated*, removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum TabEvent {
    #[serde(rename = "tabCreated", rename_all = "camelCase")]
    Created {
        tab: Tab,
        #[serde(default, alias = "parentTab", alias = "openerId")]
        opener: Option<OpenerRef>,
        #[serde(default)]
        has_parent: bool,
    },
    #[serde(rename = "tabActivated", rename_all = "camelCase")]
    Activated { tab_id: TabId },
    #[serde(rename = "tabRemoved", rename_all = "camelCase")]
    Removed { tab_id: TabId },
    #[serde(rename = "tabUpdated", rename_all = "camelCase")]
    Updated {
        tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, alias = "favIconUrl", skip_serializing_if = "Option::is_none")]
        favicon: Option<String>,
    },
}

impl TabEvent {
    /// Build an update event, or `None` when nothing visible changed.
    pub fn updated(tab_id: TabId, title: Option<String>, favicon: Option<String>) -> Option<Self> {
        if title.is_none() && favicon.is_none() {
            return None;
        }
        Some(TabEvent::Updated { tab_id, title, favicon })
    }

    /// The id of the tab this event is about.
    pub fn tab_id(&self) -> TabId {
        match self {
            TabEvent::Created { tab, .. } => tab.id,
            TabEvent::Activated { tab_id }
            | TabEvent::Removed { tab_id }
            | TabEvent::Updated { tab_id, .. } => *tab_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TabEvent::Created { .. } => "created",
            TabEvent::Activated { .. } => "activated",
            TabEvent::Removed { .. } => "removed",
            TabEvent::Updated { .. } => "updated",
        }
    }
}
