//! WxPusher Bridge - forwards host notice events to the WxPusher push API.
//!
//! This library provides a single notification-forwarding plugin: it
//! subscribes to the host's notice-message bus, applies the user-configured
//! enable and message-type filters, and posts the title/text payload to the
//! WxPusher HTTP API.
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod form;
pub mod messages;
pub mod plugin;
pub mod sender;
pub mod types;

// Re-export the main surface for convenience
pub use config::{ConfigStore, JsonFileStore, PluginConfig};
pub use plugin::{Plugin, PluginMetadata, WxPusherPlugin};
pub use sender::{PushSender, WxPusherClient};
pub use types::{NotificationEvent, NotificationType};
