//! Sidebar controller.
//!
//! Owns the [`TabTree`] and the group control. Every change arrives as a
//! [`SidebarMessage`] and is applied by [`Sidebar::handle`] as one complete
//! step. Long-running work (categorization, tab commands) is spawned and
//! reports back through the same channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tabgrouper_protocols::{TabEvent, TabId, TabOracle, TabOracleError};

use crate::event_relay::{EventRelay, PipelineUpdate, SidebarMessage, UserCommand};
use crate::pipeline::CategorizationPipeline;
use crate::tree::TabTree;

#[cfg(test)]
#[path = "sidebar_tests.rs"]
mod tests;

/// State of the "Group Tabs" control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlState {
    Ready,
    /// A categorization is in flight; further requests are ignored.
    Working { status: String },
    /// The last categorization failed. Accepts new requests like `Ready`.
    Failed { message: String },
}

impl ControlState {
    /// Text shown on the control.
    pub fn label(&self) -> String {
        match self {
            ControlState::Ready => "Group Tabs".to_string(),
            ControlState::Working { status } => status.clone(),
            ControlState::Failed { message } => format!("Error: {}", message),
        }
    }
}

pub struct Sidebar {
    tree: TabTree,
    control: ControlState,
    oracle: Arc<dyn TabOracle>,
    pipeline: CategorizationPipeline,
    relay: EventRelay,
}

impl Sidebar {
    pub fn new(
        oracle: Arc<dyn TabOracle>,
        pipeline: CategorizationPipeline,
        relay: EventRelay,
    ) -> Self {
        Self {
            tree: TabTree::new(),
            control: ControlState::Ready,
            oracle,
            pipeline,
            relay,
        }
    }

    pub fn tree(&self) -> &TabTree {
        &self.tree
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    pub fn is_working(&self) -> bool {
        matches!(self.control, ControlState::Working { .. })
    }

    /// Load the current tabs into the fallback group.
    pub async fn initialize(&mut self) -> Result<(), TabOracleError> {
        let tabs = self.oracle.query_tabs().await?;
        self.tree.initialize(&tabs);
        Ok(())
    }

    /// Apply one message. Returns `false` on shutdown.
    pub fn handle(&mut self, message: SidebarMessage) -> bool {
        match message {
            SidebarMessage::Tab(event) => self.on_tab_event(event),
            SidebarMessage::Pipeline(update) => self.on_pipeline_update(update),
            SidebarMessage::User(command) => self.on_user_command(command),
            SidebarMessage::Shutdown => return false,
        }
        true
    }

    /// Consume messages until shutdown or until every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SidebarMessage>) -> Self {
        while let Some(message) = rx.recv().await {
            if !self.handle(message) {
                debug!("Sidebar shutting down");
                break;
            }
        }
        self
    }

    fn on_tab_event(&mut self, event: TabEvent) {
        let tab_id = event.tab_id();
        let applied = match event {
            TabEvent::Created {
                tab,
                opener,
                has_parent,
            } => self
                .tree
                .on_tab_created(&tab, opener.as_ref(), has_parent)
                .is_some(),
            TabEvent::Activated { tab_id } => self.tree.on_tab_activated(tab_id),
            TabEvent::Removed { tab_id } => self.tree.on_tab_removed(tab_id),
            TabEvent::Updated {
                tab_id,
                title,
                favicon,
            } => self
                .tree
                .on_tab_updated(tab_id, title.as_deref(), favicon.as_deref()),
        };
        if !applied {
            debug!("Tab event for {} had no effect", tab_id);
        }
    }

    fn on_pipeline_update(&mut self, update: PipelineUpdate) {
        match update {
            PipelineUpdate::Status(status) => {
                if self.is_working() {
                    self.control = ControlState::Working { status };
                }
            }
            PipelineUpdate::Output { grouping, tabs } => {
                match self.tree.apply_grouping(grouping, &tabs) {
                    Ok(()) => self.control = ControlState::Ready,
                    Err(e) => {
                        warn!("Discarding grouping: {}", e);
                        self.control = ControlState::Failed {
                            message: e.to_string(),
                        };
                    }
                }
            }
            PipelineUpdate::Error(message) => {
                self.control = ControlState::Failed { message };
            }
        }
    }

    fn on_user_command(&mut self, command: UserCommand) {
        match command {
            UserCommand::GroupTabs { selected_api } => self.start_grouping(selected_api),
            UserCommand::ActivateTab(tab_id) => self.activate_tab(tab_id),
            UserCommand::CloseTab(tab_id) => self.close_tab(tab_id),
            UserCommand::MoveTab {
                tab_id,
                group,
                position,
            } => {
                if !self.tree.move_tab(tab_id, &group, position) {
                    debug!("Move of tab {} to '{}' ignored", tab_id, group);
                }
            }
            UserCommand::ToggleGroup(name) => {
                self.tree.toggle_group(&name);
            }
        }
    }

    fn start_grouping(&mut self, selected_api: String) {
        if self.is_working() {
            debug!("Categorization already in flight, ignoring request");
            return;
        }

        info!("Starting categorization with {}", selected_api);
        self.control = ControlState::Working {
            status: crate::pipeline::STATUS_CATEGORIZING.to_string(),
        };

        let pipeline = self.pipeline.clone();
        let relay = self.relay.clone();
        tokio::spawn(async move {
            pipeline.run_and_report(&selected_api, &relay).await;
        });
    }

    fn activate_tab(&self, tab_id: TabId) {
        let oracle = Arc::clone(&self.oracle);
        tokio::spawn(async move {
            if let Err(e) = oracle.activate_tab(tab_id).await {
                warn!("Failed to activate tab {}: {}", tab_id, e);
            }
        });
    }

    fn close_tab(&mut self, tab_id: TabId) {
        self.tree.on_tab_removed(tab_id);
        let oracle = Arc::clone(&self.oracle);
        tokio::spawn(async move {
            if let Err(e) = oracle.remove_tab(tab_id).await {
                warn!("Failed to close tab {}: {}", tab_id, e);
            }
        });
    }
}
