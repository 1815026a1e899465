use std::sync::Arc;

use clap::{Parser, Subcommand};
use herald::{config::AppConfig, http_server, plugins::PluginRegistry};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing app.yaml.
    #[arg(long)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the callback server.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_server(cli.config_dir.as_deref()).await?,
    }

    Ok(())
}

async fn run_server(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(config_dir)?;
    tracing::debug!(
        listen_address = %config.server.listen_address,
        plugins = ?config.plugins,
        "Configuration loaded."
    );

    let registry = Arc::new(PluginRegistry::from_config(&config)?);
    if registry.is_empty() {
        tracing::warn!("No plugins configured; inbound events will be dropped.");
    }
    tracing::info!(plugins = registry.len(), "Plugin registry initialized.");

    http_server::run_server_from_config(&config, registry).await;

    Ok(())
}
