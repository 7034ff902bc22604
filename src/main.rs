//! WxPusher Bridge binary.
//!
//! Stands in for the host process: it reads notice events as JSON lines on
//! stdin, publishes them on the notice bus, and runs the WxPusher plugin
//! against that bus until stdin closes or a shutdown signal arrives.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wxpusher_bridge::{
    cli::Cli,
    config::{AppConfig, ConfigStore, JsonFileStore},
    dispatcher::Dispatcher,
    messages::SystemMessages,
    plugin::{Plugin, WxPusherPlugin},
    types::NotificationEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment,
    // and CLI args.
    let config = AppConfig::load(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!("WxPusher bridge starting up...");
    info!("Log Level: {}", config.log_level);
    info!("State Path: {}", config.state_path.display());

    // The store is the source of truth for plugin settings; the layered
    // config only seeds it on first run.
    let store = JsonFileStore::new(&config.state_path);
    if !store.exists() {
        store.save(&config.plugin).await?;
    }

    let (messages, mut messages_rx) = SystemMessages::channel();
    let mut plugin = WxPusherPlugin::new(messages);
    plugin.init(&store).await?;

    let (bus_tx, bus_rx) = broadcast::channel::<NotificationEvent>(64);
    let dispatcher = Dispatcher::spawn(Arc::new(plugin), bus_rx);

    // Surface transient system messages in the log.
    let messages_task = tokio::spawn(async move {
        while let Some(message) = messages_rx.recv().await {
            info!(message = %message, "System message");
        }
    });

    // Feed the bus from stdin, one JSON-encoded notice event per line.
    let mut stdin_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<NotificationEvent>(line) {
                        Ok(event) => {
                            let _ = bus_tx.send(event);
                        }
                        Err(e) => warn!(error = %e, "Ignoring malformed notice event"),
                    }
                }
                Ok(None) => {
                    info!("stdin closed, no further notice events.");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to read from stdin");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Shutting down gracefully...");
            stdin_task.abort();
        }
        _ = &mut stdin_task => {}
    }

    dispatcher.shutdown().await;
    if let Err(e) = messages_task.await {
        error!("System message task panicked: {:?}", e);
    }

    info!("All tasks shut down. Exiting.");
    Ok(())
}
