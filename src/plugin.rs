//! Plugin metadata, lifecycle, and the notice-event handler.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigStore, PluginConfig};
use crate::messages::SystemMessages;
use crate::sender::{PushSender, WxPusherClient};
use crate::types::NotificationEvent;

/// Static plugin metadata, registered with the host at composition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    /// Prefix for the plugin's keys in the host config store.
    pub config_prefix: &'static str,
}

/// The lifecycle contract a plugin implements towards the host.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn metadata(&self) -> &PluginMetadata;

    /// Loads persisted configuration and reconciles one-shot flags.
    async fn init(&mut self, store: &dyn ConfigStore) -> Result<()>;

    /// Handles one inbound notice event. Nothing is observable by the bus;
    /// failures are logged, never returned to the host.
    async fn handle_event(&self, event: &NotificationEvent);

    /// Releases background resources. Errors are logged, never propagated.
    async fn shutdown(&self);
}

const METADATA: PluginMetadata = PluginMetadata {
    name: "WxPusher Bridge",
    description: "Forwards notice messages to the WxPusher push API.",
    version: env!("CARGO_PKG_VERSION"),
    author: "wxpusher-bridge",
    config_prefix: "wxpushermsg_",
};

const TEST_TITLE: &str = "WxPusher notification test";
const TEST_TEXT: &str = "WxPusher notification test message";

/// Forwards the host's notice events to WxPusher.
pub struct WxPusherPlugin {
    metadata: PluginMetadata,
    config: PluginConfig,
    messages: SystemMessages,
    sender: Option<Arc<dyn PushSender>>,
    sender_override: Option<Arc<dyn PushSender>>,
}

impl WxPusherPlugin {
    pub fn new(messages: SystemMessages) -> Self {
        Self {
            metadata: METADATA,
            config: PluginConfig::default(),
            messages,
            sender: None,
            sender_override: None,
        }
    }

    /// Replaces the WxPusher client with a caller-provided sender. Used by
    /// tests to observe what would be sent.
    pub fn with_sender(mut self, sender: Arc<dyn PushSender>) -> Self {
        self.sender_override = Some(sender);
        self
    }

    /// Active iff the plugin is enabled and both credentials are present.
    pub fn is_active(&self) -> bool {
        self.config.enabled && self.config.has_credentials()
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Explicit, edge-triggered test command: sends one test message and
    /// reports the outcome on the system message queue.
    pub async fn send_test(&self) -> bool {
        let Some(sender) = &self.sender else {
            warn!("Test send requested before the plugin was initialized");
            return false;
        };
        let ok = sender.send(TEST_TITLE, TEST_TEXT).await;
        if ok {
            self.messages.put("WxPusher notification test succeeded");
        } else {
            self.messages
                .put("WxPusher notification test failed, see the log for details");
        }
        ok
    }
}

#[async_trait]
impl Plugin for WxPusherPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn init(&mut self, store: &dyn ConfigStore) -> Result<()> {
        self.config = store.load().await?;

        let sender = match &self.sender_override {
            Some(sender) => sender.clone(),
            None => Arc::new(WxPusherClient::from_config(&self.config)?) as Arc<dyn PushSender>,
        };
        self.sender = Some(sender);

        // The one-shot flag is consumed here and never persisted as true,
        // so it cannot re-fire without the user switching it back on.
        if self.config.onlyonce {
            self.send_test().await;
            self.config.onlyonce = false;
        }
        store.save(&self.config).await?;

        info!(
            plugin = self.metadata.name,
            active = self.is_active(),
            "Plugin initialized"
        );
        Ok(())
    }

    #[instrument(skip_all)]
    async fn handle_event(&self, event: &NotificationEvent) {
        if !self.is_active() {
            return;
        }

        // Channel-specific events belong to channel-specific plugins; this
        // one only serves the default (unchanneled) path.
        if event.channel.as_deref().is_some_and(|c| !c.is_empty()) {
            return;
        }

        let title = event.title.as_deref().unwrap_or("");
        let text = event.text.as_deref().unwrap_or("");
        if title.is_empty() && text.is_empty() {
            warn!("Notice event carries neither title nor text, nothing to send");
            return;
        }

        if !self.config.allows(event.msg_type) {
            if let Some(msg_type) = event.msg_type {
                info!(
                    msg_type = msg_type.label(),
                    "Message type not enabled for forwarding"
                );
            }
            return;
        }

        let Some(sender) = &self.sender else {
            warn!("Notice event received before the plugin was initialized");
            return;
        };
        // The image field, when present, is intentionally dropped: the
        // provider payload has no image slot.
        sender.send(title, text).await;
    }

    async fn shutdown(&self) {
        // No background jobs are ever scheduled; the hook exists for
        // symmetry with the host's plugin lifecycle.
        debug!(plugin = self.metadata.name, "Plugin shut down");
    }
}
