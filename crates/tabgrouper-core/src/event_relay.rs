//! Event relay between the browser boundary and the sidebar.
//!
//! Everything the sidebar reacts to travels through one unbounded, ordered
//! channel: tab lifecycle events, pipeline progress and user commands. A
//! single consumer applies them one at a time, so per-tab event order is the
//! order of emission.

use tokio::sync::mpsc;
use tracing::debug;

use tabgrouper_protocols::{Tab, TabEvent, TabId};

use crate::normalizer::CanonicalGrouping;

/// Progress of a categorization request.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineUpdate {
    /// Intermediate status text.
    Status(String),
    /// Terminal success: the grouping and the snapshot tabs it indexes.
    Output {
        grouping: CanonicalGrouping,
        tabs: Vec<Tab>,
    },
    /// Terminal failure with a user-visible message.
    Error(String),
}

impl PipelineUpdate {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineUpdate::Status(_))
    }
}

/// User input from the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Start a categorization with the given provider selector.
    GroupTabs { selected_api: String },
    ActivateTab(TabId),
    CloseTab(TabId),
    MoveTab {
        tab_id: TabId,
        group: String,
        position: usize,
    },
    ToggleGroup(String),
}

/// A message consumed by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarMessage {
    Tab(TabEvent),
    Pipeline(PipelineUpdate),
    User(UserCommand),
    Shutdown,
}

/// Sending half of the sidebar channel.
///
/// Sends are fire-and-forget. A closed sidebar drops messages silently.
#[derive(Debug, Clone)]
pub struct EventRelay {
    tx: mpsc::UnboundedSender<SidebarMessage>,
}

impl EventRelay {
    /// Create a relay and the receiver the sidebar consumes.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SidebarMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, message: SidebarMessage) {
        if self.tx.send(message).is_err() {
            debug!("Sidebar channel closed, dropping message");
        }
    }

    pub fn publish(&self, event: TabEvent) {
        debug!("Relaying {} event for tab {}", event.kind(), event.tab_id());
        self.send(SidebarMessage::Tab(event));
    }

    pub fn status(&self, text: impl Into<String>) {
        self.send(SidebarMessage::Pipeline(PipelineUpdate::Status(text.into())));
    }

    pub fn output(&self, grouping: CanonicalGrouping, tabs: Vec<Tab>) {
        self.send(SidebarMessage::Pipeline(PipelineUpdate::Output { grouping, tabs }));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(SidebarMessage::Pipeline(PipelineUpdate::Error(message.into())));
    }

    pub fn command(&self, command: UserCommand) {
        self.send(SidebarMessage::User(command));
    }

    pub fn shutdown(&self) {
        self.send(SidebarMessage::Shutdown);
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_messages_arrive_in_order() {
        let (relay, mut rx) = EventRelay::channel();
        relay.publish(TabEvent::Created {
            tab: Tab::new(1, "a", "u"),
            opener: None,
            has_parent: false,
        });
        relay.publish(TabEvent::Activated { tab_id: 1 });
        relay.publish(TabEvent::Removed { tab_id: 1 });

        let kinds: Vec<&str> = [rx.recv().await, rx.recv().await, rx.recv().await]
            .into_iter()
            .map(|m| match m {
                Some(SidebarMessage::Tab(e)) => e.kind(),
                other => panic!("Unexpected message: {:?}", other),
            })
            .collect();
        assert_eq!(kinds, vec!["created", "activated", "removed"]);
    }

    #[tokio::test]
    async fn test_send_after_close_is_silent() {
        let (relay, rx) = EventRelay::channel();
        drop(rx);
        assert!(relay.is_closed());
        relay.status("still fine");
    }

    #[test]
    fn test_terminal_updates() {
        assert!(!PipelineUpdate::Status("x".into()).is_terminal());
        assert!(PipelineUpdate::Error("x".into()).is_terminal());
    }
}
