//! Integration tests for the notice-event handler's filter chain.

use std::sync::Arc;
use wxpusher_bridge::config::{MemoryStore, PluginConfig};
use wxpusher_bridge::messages::SystemMessages;
use wxpusher_bridge::plugin::{Plugin, WxPusherPlugin};
use wxpusher_bridge::sender::FakeSender;
use wxpusher_bridge::types::{NotificationEvent, NotificationType};

fn forwarding_config() -> PluginConfig {
    PluginConfig {
        enabled: true,
        onlyonce: false,
        uuid: "UID_x".to_string(),
        apptoken: "AT_y".to_string(),
        msgtypes: Vec::new(),
    }
}

async fn plugin_with(config: PluginConfig) -> (WxPusherPlugin, Arc<FakeSender>) {
    let fake = Arc::new(FakeSender::new());
    let (messages, _rx) = SystemMessages::channel();
    let mut plugin = WxPusherPlugin::new(messages).with_sender(fake.clone());
    plugin
        .init(&MemoryStore::with_config(config))
        .await
        .expect("plugin init failed");
    (plugin, fake)
}

fn manual_event(title: &str, text: &str) -> NotificationEvent {
    NotificationEvent {
        msg_type: Some(NotificationType::Manual),
        title: Some(title.to_string()),
        text: Some(text.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn disabled_plugin_forwards_nothing() {
    let config = PluginConfig {
        enabled: false,
        ..forwarding_config()
    };
    let (plugin, fake) = plugin_with(config).await;
    assert!(!plugin.is_active());

    plugin.handle_event(&manual_event("T", "B")).await;
    assert!(fake.sent().is_empty());
}

#[tokio::test]
async fn missing_credentials_forward_nothing() {
    let config = PluginConfig {
        apptoken: String::new(),
        ..forwarding_config()
    };
    let (plugin, fake) = plugin_with(config).await;
    assert!(!plugin.is_active());

    plugin.handle_event(&manual_event("T", "B")).await;
    assert!(fake.sent().is_empty());
}

#[tokio::test]
async fn channeled_events_are_someone_elses_job() {
    let (plugin, fake) = plugin_with(forwarding_config()).await;

    let event = NotificationEvent {
        channel: Some("telegram".to_string()),
        ..manual_event("T", "B")
    };
    plugin.handle_event(&event).await;
    assert!(fake.sent().is_empty());

    // An empty channel string counts as the default path.
    let event = NotificationEvent {
        channel: Some(String::new()),
        ..manual_event("T", "B")
    };
    plugin.handle_event(&event).await;
    assert_eq!(fake.sent().len(), 1);
}

#[tokio::test]
async fn empty_title_and_text_is_dropped() {
    let (plugin, fake) = plugin_with(forwarding_config()).await;

    plugin
        .handle_event(&NotificationEvent {
            msg_type: Some(NotificationType::Manual),
            ..Default::default()
        })
        .await;
    assert!(fake.sent().is_empty());

    // Either field alone is enough to send.
    plugin.handle_event(&manual_event("", "only text")).await;
    assert_eq!(fake.sent(), vec![(String::new(), "only text".to_string())]);
}

#[tokio::test]
async fn allowlist_filters_other_types() {
    let config = PluginConfig {
        msgtypes: vec![NotificationType::Manual],
        ..forwarding_config()
    };
    let (plugin, fake) = plugin_with(config).await;

    let mut event = manual_event("T", "B");
    event.msg_type = Some(NotificationType::Download);
    plugin.handle_event(&event).await;
    assert!(fake.sent().is_empty());
}

#[tokio::test]
async fn allowlisted_type_is_forwarded_exactly_once() {
    let config = PluginConfig {
        msgtypes: vec![NotificationType::Manual],
        ..forwarding_config()
    };
    let (plugin, fake) = plugin_with(config).await;

    plugin.handle_event(&manual_event("T", "B")).await;
    assert_eq!(fake.sent(), vec![("T".to_string(), "B".to_string())]);
}

#[tokio::test]
async fn empty_allowlist_forwards_every_type() {
    let (plugin, fake) = plugin_with(forwarding_config()).await;

    for msg_type in NotificationType::ALL {
        let mut event = manual_event("T", "B");
        event.msg_type = Some(msg_type);
        plugin.handle_event(&event).await;
    }
    // Events without a type pass the allowlist too.
    let mut event = manual_event("T", "B");
    event.msg_type = None;
    plugin.handle_event(&event).await;

    assert_eq!(fake.sent().len(), NotificationType::ALL.len() + 1);
}

#[tokio::test]
async fn image_is_accepted_but_never_forwarded() {
    let (plugin, fake) = plugin_with(forwarding_config()).await;

    let event = NotificationEvent {
        image: Some("https://example.com/poster.jpg".to_string()),
        ..manual_event("T", "B")
    };
    plugin.handle_event(&event).await;
    // Only title and text reach the sender.
    assert_eq!(fake.sent(), vec![("T".to_string(), "B".to_string())]);
}
