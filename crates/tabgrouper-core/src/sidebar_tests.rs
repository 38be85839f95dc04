use std::time::Duration;

use super::*;
use serde_json::json;
use tabgrouper_protocols::Tab;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::CategorizeClient;
use crate::memory_oracle::MemoryTabOracle;
use crate::tree::{TreeState, UNSORTED_GROUP};

struct Harness {
    sidebar: Sidebar,
    oracle: Arc<MemoryTabOracle>,
    relay: EventRelay,
    rx: mpsc::UnboundedReceiver<SidebarMessage>,
    server: MockServer,
}

impl Harness {
    async fn new(response: ResponseTemplate) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(response)
            .mount(&server)
            .await;

        let (relay, rx) = EventRelay::channel();
        let oracle = Arc::new(
            MemoryTabOracle::new(vec![
                Tab::new(1, "Paper", "https://arxiv.org/abs/1"),
                Tab::new(2, "Chat", "https://chat.example"),
                Tab::new(3, "Notes", "https://notes.example"),
            ])
            .with_relay(relay.clone()),
        );
        let dyn_oracle: Arc<dyn TabOracle> = oracle.clone();
        let client = CategorizeClient::new(format!("{}/categorize", server.uri()));
        let pipeline = CategorizationPipeline::new(Arc::clone(&dyn_oracle), client);
        let mut sidebar = Sidebar::new(dyn_oracle, pipeline, relay.clone());
        sidebar.initialize().await.unwrap();

        Self {
            sidebar,
            oracle,
            relay,
            rx,
            server,
        }
    }

    async fn answering(text: &str) -> Self {
        Self::new(
            ResponseTemplate::new(200)
                .set_body_json(json!({"content": [{"type": "text", "text": text}]})),
        )
        .await
    }

    async fn next(&mut self) -> SidebarMessage {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for sidebar message")
            .expect("channel closed")
    }

    /// Handle messages until the control leaves `Working`.
    async fn settle(&mut self) {
        while self.sidebar.is_working() {
            let message = self.next().await;
            self.sidebar.handle(message);
        }
    }

    /// Handle whatever is already queued.
    fn drain(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.sidebar.handle(message);
        }
    }

    fn group_tabs(&mut self) {
        self.sidebar.handle(SidebarMessage::User(UserCommand::GroupTabs {
            selected_api: "anthropic".to_string(),
        }));
    }
}

const GOOD: &str = "```json\n{\"Research\": [0, 2], \"Chat\": [1]}\n```";

#[test]
fn test_control_labels() {
    assert_eq!(ControlState::Ready.label(), "Group Tabs");
    assert_eq!(
        ControlState::Working {
            status: "Sending request to local server...".into()
        }
        .label(),
        "Sending request to local server..."
    );
    assert_eq!(
        ControlState::Failed {
            message: "boom".into()
        }
        .label(),
        "Error: boom"
    );
}

#[tokio::test]
async fn test_initialize_shows_unsorted() {
    let h = Harness::answering(GOOD).await;
    assert_eq!(h.sidebar.tree().state(), TreeState::Unsorted);
    assert_eq!(
        h.sidebar.tree().group(UNSORTED_GROUP).unwrap().tab_ids(),
        vec![1, 2, 3]
    );
    assert_eq!(h.sidebar.control(), &ControlState::Ready);
}

#[tokio::test]
async fn test_group_tabs_applies_grouping() {
    let mut h = Harness::answering(GOOD).await;
    h.group_tabs();
    assert!(h.sidebar.is_working());
    h.settle().await;

    let tree = h.sidebar.tree();
    assert_eq!(tree.state(), TreeState::Categorized);
    assert_eq!(tree.group("Research").unwrap().tab_ids(), vec![1, 3]);
    assert_eq!(tree.group("Chat").unwrap().tab_ids(), vec![2]);
    assert_eq!(h.sidebar.control(), &ControlState::Ready);
}

#[tokio::test]
async fn test_request_while_working_is_ignored() {
    let mut h = Harness::answering(GOOD).await;
    h.group_tabs();
    h.group_tabs();
    h.settle().await;

    assert_eq!(h.server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failure_keeps_tree_and_reports() {
    let mut h = Harness::new(
        ResponseTemplate::new(500).set_body_json(json!({"error": "Error processing request"})),
    )
    .await;
    h.group_tabs();
    h.settle().await;

    assert_eq!(h.sidebar.tree().state(), TreeState::Unsorted);
    assert_eq!(h.sidebar.tree().tab_count(), 3);
    match h.sidebar.control() {
        ControlState::Failed { message } => assert!(message.contains("500")),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert!(h.sidebar.control().label().starts_with("Error: "));

    // A failed control accepts a new request.
    h.group_tabs();
    assert!(h.sidebar.is_working());
}

#[tokio::test]
async fn test_invalid_partition_keeps_tree() {
    let mut h = Harness::answering("```json\n{\"Research\": [0, 0, 1]}\n```").await;
    h.group_tabs();
    h.settle().await;

    assert_eq!(h.sidebar.tree().state(), TreeState::Unsorted);
    assert!(matches!(h.sidebar.control(), ControlState::Failed { .. }));
}

#[tokio::test]
async fn test_grouping_supersedes_events_during_flight() {
    let mut h = Harness::answering(GOOD).await;
    h.group_tabs();
    h.sidebar.handle(SidebarMessage::Tab(TabEvent::Created {
        tab: Tab::new(50, "Late", "https://late"),
        opener: None,
        has_parent: false,
    }));
    assert!(h.sidebar.tree().tab(50).is_some());

    h.settle().await;
    assert!(h.sidebar.tree().tab(50).is_none());
    assert_eq!(h.sidebar.tree().state(), TreeState::Categorized);
}

#[tokio::test]
async fn test_new_tab_joins_opener_group() {
    let mut h = Harness::answering(GOOD).await;
    h.group_tabs();
    h.settle().await;

    let child = h.oracle.open_tab("Related paper", "https://arxiv.org/abs/2", Some(3));
    let message = h.next().await;
    h.sidebar.handle(message);

    assert_eq!(h.sidebar.tree().locate(child), Some(("Research", 2)));
}

#[tokio::test]
async fn test_activate_command_round_trips_through_oracle() {
    let mut h = Harness::answering(GOOD).await;
    h.sidebar.handle(SidebarMessage::User(UserCommand::ActivateTab(2)));

    let message = h.next().await;
    assert_eq!(message, SidebarMessage::Tab(TabEvent::Activated { tab_id: 2 }));
    h.sidebar.handle(message);
    assert_eq!(h.sidebar.tree().active_tab(), Some(2));
    assert_eq!(h.oracle.active_tab(), Some(2));
}

#[tokio::test]
async fn test_close_command_removes_node_immediately() {
    let mut h = Harness::answering(GOOD).await;
    h.sidebar.handle(SidebarMessage::User(UserCommand::CloseTab(1)));
    assert!(h.sidebar.tree().tab(1).is_none());

    // The oracle's own removal event arrives afterwards and is a no-op.
    let message = h.next().await;
    assert_eq!(message, SidebarMessage::Tab(TabEvent::Removed { tab_id: 1 }));
    h.sidebar.handle(message);
    assert_eq!(h.sidebar.tree().tab_count(), 2);
    assert_eq!(h.oracle.tabs().len(), 2);
}

#[tokio::test]
async fn test_close_unknown_tab_is_logged_not_fatal() {
    let mut h = Harness::answering(GOOD).await;
    h.sidebar.handle(SidebarMessage::User(UserCommand::CloseTab(99)));
    tokio::time::sleep(Duration::from_millis(20)).await;
    h.drain();
    assert_eq!(h.sidebar.tree().tab_count(), 3);
}

#[tokio::test]
async fn test_move_and_toggle_commands() {
    let mut h = Harness::answering(GOOD).await;
    h.group_tabs();
    h.settle().await;

    h.sidebar.handle(SidebarMessage::User(UserCommand::MoveTab {
        tab_id: 2,
        group: "Research".to_string(),
        position: 1,
    }));
    assert_eq!(
        h.sidebar.tree().group("Research").unwrap().tab_ids(),
        vec![1, 2, 3]
    );

    h.sidebar
        .handle(SidebarMessage::User(UserCommand::ToggleGroup("Chat".to_string())));
    assert!(h.sidebar.tree().group("Chat").unwrap().is_collapsed());
}

#[tokio::test]
async fn test_title_update_patches_tree() {
    let mut h = Harness::answering(GOOD).await;
    h.oracle.set_title(3, "Renamed").unwrap();
    let message = h.next().await;
    h.sidebar.handle(message);
    assert_eq!(h.sidebar.tree().tab(3).unwrap().title(), "Renamed");
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let h = Harness::answering(GOOD).await;
    h.relay.publish(TabEvent::Activated { tab_id: 3 });
    h.relay.shutdown();

    let sidebar = h.sidebar.run(h.rx).await;
    assert_eq!(sidebar.tree().active_tab(), Some(3));
}
