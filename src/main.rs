mod commands;
mod config;
mod cursor;
mod dispatch;
mod error;
mod logging;
mod platform;
mod poll;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::platform::telegram::TelegramClient;
use crate::platform::ChatTransport;
use crate::poll::PollLoop;
use crate::state::ChatStateStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("conf.json"));

    // Load before logging so the log directory can come from the config,
    // but only report the outcome once the subscriber is installed
    let loaded = Config::load(&config_path);
    let log_dir = loaded
        .as_ref()
        .map(|c| c.log_directory.clone())
        .unwrap_or_else(|_| config::default_log_directory());
    let _log_guard = logging::init(&log_dir)?;

    info!("Starting up");
    info!("Loading configuration from: {}", config_path.display());
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Failed to load configuration");
        }
    };

    info!("Configuration loaded successfully");
    info!("  API: {}", config.api_base_url);
    info!("  Poll timeout: {}s", config.poll_timeout_secs);
    info!("  State database: {}", config.database_path.display());

    let store = ChatStateStore::open(&config.database_path)
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    let transport: Arc<dyn ChatTransport> = Arc::new(TelegramClient::new(
        &config.api_base_url,
        &config.token,
        config.poll_timeout_secs,
    ));
    let dispatcher = Dispatcher::new(transport.clone(), store);
    let mut poll = PollLoop::new(transport, dispatcher, config.idle_interval());

    if let Err(e) = poll.run().await {
        error!("Polling stopped: {}", e);
        return Err(e).context("Bot stopped");
    }

    Ok(())
}
