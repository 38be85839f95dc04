//! In-memory tab oracle.
//!
//! Stands in for the browser's tab APIs: holds one window's tabs, answers
//! queries, and emits lifecycle events through an attached [`EventRelay`]
//! when tabs are opened, updated, activated or closed.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use tabgrouper_protocols::{OpenerRef, Tab, TabEvent, TabId, TabOracle, TabOracleError};

use crate::event_relay::EventRelay;

#[cfg(test)]
#[path = "memory_oracle_tests.rs"]
mod tests;

struct WindowState {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: TabId,
}

/// A single browser window held in memory.
pub struct MemoryTabOracle {
    state: Mutex<WindowState>,
    relay: Option<EventRelay>,
}

impl MemoryTabOracle {
    pub fn new(tabs: Vec<Tab>) -> Self {
        let next_id = tabs.iter().map(|t| t.id).max().map_or(1, |max| max + 1);
        Self {
            state: Mutex::new(WindowState {
                tabs,
                active: None,
                next_id,
            }),
            relay: None,
        }
    }

    /// Emit lifecycle events to `relay`.
    pub fn with_relay(mut self, relay: EventRelay) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Publish an event. Callers hold the state lock so that events for one
    /// tab reach the relay in the order the mutations happened.
    fn emit(&self, event: TabEvent) {
        if let Some(relay) = &self.relay {
            relay.publish(event);
        }
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.state.lock().tabs.clone()
    }

    pub fn active_tab(&self) -> Option<TabId> {
        self.state.lock().active
    }

    /// Open a new tab, optionally from an opener, and return its id.
    pub fn open_tab(
        &self,
        title: impl Into<String>,
        url: impl Into<String>,
        opener: Option<TabId>,
    ) -> TabId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let mut tab = Tab::new(id, title, url);
        tab.opener_id = opener;
        let parent = opener.and_then(|oid| state.tabs.iter().find(|t| t.id == oid).cloned());
        state.tabs.push(tab.clone());

        let has_parent = parent.is_some();
        self.emit(TabEvent::Created {
            tab,
            opener: parent.map(OpenerRef::Tab),
            has_parent,
        });
        id
    }

    /// Close a tab from the browser side.
    pub fn close_tab(&self, id: TabId) -> Result<(), TabOracleError> {
        let mut state = self.state.lock();
        let pos = state
            .tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or(TabOracleError::TabNotFound(id))?;
        state.tabs.remove(pos);
        if state.active == Some(id) {
            state.active = None;
        }
        self.emit(TabEvent::Removed { tab_id: id });
        Ok(())
    }

    pub fn set_title(&self, id: TabId, title: impl Into<String>) -> Result<(), TabOracleError> {
        self.update(id, Some(title.into()), None)
    }

    pub fn set_favicon(&self, id: TabId, favicon: impl Into<String>) -> Result<(), TabOracleError> {
        self.update(id, None, Some(favicon.into()))
    }

    /// Apply a change and emit `updated` only for fields that actually changed.
    fn update(
        &self,
        id: TabId,
        title: Option<String>,
        favicon: Option<String>,
    ) -> Result<(), TabOracleError> {
        let mut state = self.state.lock();
        let tab = state
            .tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TabOracleError::TabNotFound(id))?;

        let title = title.filter(|t| *t != tab.title);
        let favicon = favicon.filter(|f| tab.favicon.as_deref() != Some(f.as_str()));
        if let Some(title) = &title {
            tab.title = title.clone();
        }
        if let Some(favicon) = &favicon {
            tab.favicon = Some(favicon.clone());
        }

        match TabEvent::updated(id, title, favicon) {
            Some(event) => self.emit(event),
            None => debug!("Tab {} update changed nothing", id),
        }
        Ok(())
    }
}

#[async_trait]
impl TabOracle for MemoryTabOracle {
    async fn query_tabs(&self) -> Result<Vec<Tab>, TabOracleError> {
        Ok(self.tabs())
    }

    async fn get_tab(&self, id: TabId) -> Result<Tab, TabOracleError> {
        self.state
            .lock()
            .tabs
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TabOracleError::TabNotFound(id))
    }

    async fn activate_tab(&self, id: TabId) -> Result<(), TabOracleError> {
        let mut state = self.state.lock();
        if !state.tabs.iter().any(|t| t.id == id) {
            return Err(TabOracleError::TabNotFound(id));
        }
        state.active = Some(id);
        self.emit(TabEvent::Activated { tab_id: id });
        Ok(())
    }

    async fn remove_tab(&self, id: TabId) -> Result<(), TabOracleError> {
        self.close_tab(id)
    }
}
