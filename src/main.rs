//! covdash - a personal covid statistics and news dashboard service.
//!
//! Usage:
//!   covdash serve --config config.json
//!   covdash init-config --config config.json [--force]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use covdash::api::{create_api_state, start_server, ApiConfig};
use covdash::config::{ConfigStore, JsonConfigStore};
use covdash::events::{Event, EventBus, EventHandler};
use covdash::providers::{NewsApi, UkCovidApi};
use covdash::scheduler::Dashboard;

/// covdash - scheduled covid statistics and news behind a JSON API
#[derive(Parser)]
#[command(name = "covdash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard service
    Serve {
        /// Path to the config file
        #[arg(short, long, default_value = "config.json", env = "COVDASH_CONFIG")]
        config: PathBuf,

        /// Host to bind the API server to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind the API server to
        #[arg(short, long, default_value = "8050")]
        port: u16,
    },

    /// Write a default config file
    InitConfig {
        /// Path to the config file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Simple logging event handler that prints engine events.
struct LoggingHandler;

#[async_trait::async_trait]
impl EventHandler for LoggingHandler {
    async fn handle(&self, event: &Event) {
        match event {
            Event::RefreshStarted { category, .. } => {
                info!("{} refresh started", category);
            }
            Event::RefreshCompleted {
                category, success, ..
            } => {
                if *success {
                    info!("{} refresh completed", category);
                } else {
                    warn!("{} refresh failed, will retry on next poll", category);
                }
            }
            Event::ScheduleAdded { title, .. } => {
                info!("schedule added: '{}'", title);
            }
            Event::ScheduleRemoved { title, .. } => {
                info!("schedule removed: '{}'", title);
            }
            Event::ScheduleRearmed { title, .. } => {
                info!("schedule re-armed for tomorrow: '{}'", title);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, host, port } => {
            serve(config, host, port).await?;
        }
        Commands::InitConfig { config, force } => {
            init_config(config, force).await?;
        }
    }

    Ok(())
}

/// Run the dashboard service until interrupted.
async fn serve(
    config_path: PathBuf,
    host: String,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("loading config from: {}", config_path.display());

    let store = JsonConfigStore::new(&config_path);
    store.init(false).await?;
    let doc = store.load_or_reset().await;
    if doc.api_key.is_empty() {
        warn!("no news api key configured; headline requests will be rejected");
    }

    let event_bus = EventBus::new();
    event_bus.register(Arc::new(LoggingHandler)).await;

    let dashboard = Dashboard::new(store, UkCovidApi::new(), NewsApi::new(doc.api_key))
        .with_event_bus(event_bus);
    let (handle, engine_task) = dashboard.start().await;

    let state = create_api_state(handle.clone());
    let server = start_server(ApiConfig::new(host, port), state).await?;
    info!("dashboard ready; press Ctrl+C to stop");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            handle.shutdown().await?;
        }
        _ = engine_task => {
            info!("engine stopped");
        }
    }

    server.abort();
    info!("goodbye");
    Ok(())
}

/// Write a default config file.
async fn init_config(config_path: PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonConfigStore::new(&config_path);
    store.init(force).await?;
    info!(
        "config ready at {}; add your news api key before serving",
        config_path.display()
    );
    Ok(())
}
