//! TabGrouper - browser tab grouping engine and local categorization relay
//!
//! Main entry point for the TabGrouper CLI and relay server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tabgrouper_config::{Config, ConfigLoader, ConfigValidator};

mod group;
mod server;

use group::{run_group, GroupOptions};
use server::{init_tracing, run_relay};

/// TabGrouper CLI.
#[derive(Parser)]
#[command(name = "tabgrouper")]
#[command(about = "Group browser tabs with a language model behind a local relay")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/tabgrouper.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the categorization relay in foreground
    Relay {
        /// Relay host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Relay port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Categorize a tab list through the relay and print the resulting groups
    Group {
        /// JSON file with an array of tabs ({id, title, url, favIconUrl?, openerTabId?})
        #[arg(long)]
        tabs: PathBuf,

        /// Provider selector (anthropic, groq)
        #[arg(long)]
        api: Option<String>,

        /// Relay endpoint (overrides config)
        #[arg(long, env = "TABGROUPER_RELAY_URL")]
        relay_url: Option<String>,

        /// Print the groups as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config_path = PathBuf::from(ConfigLoader::expand_path(&cli.config.to_string_lossy()));
    let config = load_config(&config_path)?;

    match cli.command {
        Commands::Relay { host, port } => run_relay(config, host, port).await,
        Commands::Group {
            tabs,
            api,
            relay_url,
            json,
        } => {
            let options = GroupOptions {
                tabs_path: PathBuf::from(ConfigLoader::expand_path(&tabs.to_string_lossy())),
                selected_api: api.unwrap_or_else(|| config.client.default_api.clone()),
                relay_url: relay_url.unwrap_or_else(|| config.client.relay_url.clone()),
                json,
            };
            run_group(options).await
        }
    }
}

/// Load and validate the configuration file. A missing file yields defaults.
fn load_config(path: &std::path::Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    info!("Configuration loaded from {}", path.display());

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        let messages: Vec<String> = validation
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        return Err(format!("Invalid configuration: {}", messages.join("; ")).into());
    }

    Ok(config)
}
