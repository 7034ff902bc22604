//! Subscribes a plugin to the host notice bus and manages its lifetime.
//!
//! The bus is modelled as a `broadcast` channel: the host publishes every
//! notice event, each plugin consumes its own receiver. The dispatcher owns
//! the subscriber task and provides the graceful shutdown path.

use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::plugin::Plugin;
use crate::types::NotificationEvent;

/// Runs a plugin's event loop and shuts it down on request.
pub struct Dispatcher {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
    plugin: Arc<dyn Plugin>,
}

impl Dispatcher {
    /// Registers the plugin with the bus and spawns its receive loop.
    pub fn spawn(
        plugin: Arc<dyn Plugin>,
        mut events: broadcast::Receiver<NotificationEvent>,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task_plugin = plugin.clone();
        let handle = tokio::spawn(async move {
            info!(
                plugin = task_plugin.metadata().name,
                "Plugin subscribed to notice events"
            );
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        info!("Plugin subscriber received shutdown signal.");
                        break;
                    }
                    result = events.recv() => match result {
                        Ok(event) => task_plugin.handle_event(&event).await,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Plugin subscriber lagged behind and missed {} events.", n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("Notice bus closed. Plugin subscriber shutting down.");
                            break;
                        }
                    }
                }
            }
        });
        Self {
            shutdown_tx,
            handle,
            plugin,
        }
    }

    /// Stops the subscriber task and runs the plugin's shutdown hook.
    /// Panics in the task are logged, never propagated.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            error!("Plugin subscriber task panicked: {:?}", e);
        }
        self.plugin.shutdown().await;
    }
}
