//! Core domain types shared across the bridge.
//!
//! These mirror the host's notice-event contract: an event carries an
//! optional delivery channel, a notification category, and the title/text
//! payload to forward.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// The notification categories known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    Manual,
    Download,
    Organize,
    Subscribe,
    SiteMessage,
    MediaServer,
    Plugin,
}

impl NotificationType {
    /// Every category, in the order the settings form lists them.
    pub const ALL: [NotificationType; 7] = [
        NotificationType::Manual,
        NotificationType::Download,
        NotificationType::Organize,
        NotificationType::Subscribe,
        NotificationType::SiteMessage,
        NotificationType::MediaServer,
        NotificationType::Plugin,
    ];

    /// The serialized variant name, used as the form option value.
    pub fn name(&self) -> &'static str {
        match self {
            NotificationType::Manual => "Manual",
            NotificationType::Download => "Download",
            NotificationType::Organize => "Organize",
            NotificationType::Subscribe => "Subscribe",
            NotificationType::SiteMessage => "SiteMessage",
            NotificationType::MediaServer => "MediaServer",
            NotificationType::Plugin => "Plugin",
        }
    }

    /// A human-readable label, used as the form option title.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationType::Manual => "Manual processing",
            NotificationType::Download => "Downloads",
            NotificationType::Organize => "Media organization",
            NotificationType::Subscribe => "Subscriptions",
            NotificationType::SiteMessage => "Site messages",
            NotificationType::MediaServer => "Media server",
            NotificationType::Plugin => "Plugin messages",
        }
    }
}

/// A notice event emitted by the host bus.
///
/// Events are ephemeral: produced by the host, consumed once by each
/// subscribed plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Named delivery target. A non-empty channel means a channel-specific
    /// plugin is responsible for this event, not us.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Notification category, used against the configured allowlist.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<NotificationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Accepted on the wire, but the WxPusher payload has no image field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

pub type EventSender = broadcast::Sender<NotificationEvent>;
