//! `tabgrouper group`: one categorization round trip from a tab list file.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use tabgrouper_core::{
    CategorizationPipeline, CategorizeClient, ControlState, EventRelay, MemoryTabOracle,
    PipelineUpdate, Sidebar, SidebarMessage, UserCommand,
};
use tabgrouper_protocols::{Tab, TabOracle};

pub(crate) struct GroupOptions {
    pub tabs_path: PathBuf,
    pub selected_api: String,
    pub relay_url: String,
    pub json: bool,
}

pub(crate) async fn run_group(options: GroupOptions) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&options.tabs_path)?;
    let tabs: Vec<Tab> = serde_json::from_str(&content)?;
    info!(
        "Loaded {} tabs from {}",
        tabs.len(),
        options.tabs_path.display()
    );

    let (relay, mut rx) = EventRelay::channel();
    let oracle: Arc<dyn TabOracle> = Arc::new(MemoryTabOracle::new(tabs).with_relay(relay.clone()));
    let pipeline = CategorizationPipeline::new(
        Arc::clone(&oracle),
        CategorizeClient::new(options.relay_url),
    );
    let mut sidebar = Sidebar::new(oracle, pipeline, relay.clone());
    sidebar.initialize().await?;

    relay.command(UserCommand::GroupTabs {
        selected_api: options.selected_api,
    });

    while let Some(message) = rx.recv().await {
        let requested = matches!(message, SidebarMessage::User(UserCommand::GroupTabs { .. }));
        if let SidebarMessage::Pipeline(update) = &message {
            info!("{}", update_label(update));
        }
        sidebar.handle(message);
        if !requested && !sidebar.is_working() {
            break;
        }
    }

    if let ControlState::Failed { message } = sidebar.control() {
        return Err(message.clone().into());
    }

    if options.json {
        let groups: Vec<serde_json::Value> = sidebar
            .tree()
            .groups()
            .iter()
            .map(|g| serde_json::json!({"name": g.name(), "tabIds": g.tab_ids()}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        print!("{}", sidebar.tree());
    }
    Ok(())
}

fn update_label(update: &PipelineUpdate) -> String {
    match update {
        PipelineUpdate::Status(status) => status.clone(),
        PipelineUpdate::Output { grouping, .. } => format!("Received {} groups", grouping.len()),
        PipelineUpdate::Error(message) => message.clone(),
    }
}
