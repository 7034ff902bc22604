//! A client for sending messages through the WxPusher API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::config::PluginConfig;

/// The fixed WxPusher message endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://wxpusher.zjiecode.com/api/send/message";

/// The provider's application-level success code.
const PROVIDER_SUCCESS: i64 = 1000;

/// WxPusher content type for plain text messages.
const TEXT_CONTENT_TYPE: u8 = 1;

/// A trait for clients that can push a single notification.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Sends one notification. Returns `true` on success; every failure is
    /// logged and collapsed to `false`, nothing is raised past this
    /// boundary.
    async fn send(&self, title: &str, text: &str) -> bool;
}

/// Everything that can go wrong during a send, kept internal to this
/// module. The [`PushSender`] boundary stays boolean.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("uuid and apptoken must be configured before sending")]
    MissingCredentials,
    #[error("no response received from the provider")]
    NoResponse(#[source] reqwest::Error),
    #[error("provider returned transport status {0}")]
    Transport(reqwest::StatusCode),
    #[error("provider rejected the message: {msg} (code {code})")]
    Rejected { code: i64, msg: String },
    #[error("failed to decode the provider response")]
    Decode(#[source] reqwest::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    app_token: &'a str,
    content: &'a str,
    summary: &'a str,
    content_type: u8,
    uids: [&'a str; 1],
}

#[derive(Deserialize)]
struct SendResponse {
    code: i64,
    #[serde(default)]
    msg: String,
}

/// A client for the WxPusher push API.
///
/// All sends are serialized through a mutex owned by this instance, so two
/// simultaneously-fired events never produce interleaved provider calls.
pub struct WxPusherClient {
    endpoint: String,
    uuid: String,
    apptoken: String,
    http: reqwest::Client,
    send_lock: Mutex<()>,
}

impl WxPusherClient {
    /// Creates a client for the fixed WxPusher endpoint.
    pub fn new(uuid: impl Into<String>, apptoken: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, uuid, apptoken)
    }

    /// Creates a client against an explicit endpoint. Tests point this at a
    /// mock server.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        uuid: impl Into<String>,
        apptoken: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            uuid: uuid.into(),
            apptoken: apptoken.into(),
            http,
            send_lock: Mutex::new(()),
        })
    }

    /// Builds a client from the persisted plugin configuration.
    pub fn from_config(config: &PluginConfig) -> anyhow::Result<Self> {
        Self::new(config.uuid.clone(), config.apptoken.clone())
    }

    async fn try_send(&self, title: &str, text: &str) -> Result<(), SendError> {
        if self.uuid.is_empty() || self.apptoken.is_empty() {
            return Err(SendError::MissingCredentials);
        }

        let payload = SendRequest {
            app_token: &self.apptoken,
            content: text,
            summary: title,
            content_type: TEXT_CONTENT_TYPE,
            uids: [&self.uuid],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(SendError::NoResponse)?;

        if !response.status().is_success() {
            return Err(SendError::Transport(response.status()));
        }

        let body: SendResponse = response.json().await.map_err(SendError::Decode)?;
        if body.code != PROVIDER_SUCCESS {
            return Err(SendError::Rejected {
                code: body.code,
                msg: body.msg,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PushSender for WxPusherClient {
    #[instrument(skip_all)]
    async fn send(&self, title: &str, text: &str) -> bool {
        // Only one outbound send at a time across all callers.
        let _guard = self.send_lock.lock().await;
        match self.try_send(title, text).await {
            Ok(()) => {
                info!("WxPusher message sent");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to send WxPusher message");
                false
            }
        }
    }
}

/// A fake sender that records what was sent, for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct FakeSender {
    succeed: bool,
    sent: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl FakeSender {
    pub fn new() -> Self {
        Self::with_outcome(true)
    }

    pub fn with_outcome(succeed: bool) -> Self {
        Self {
            succeed,
            sent: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// The (title, text) pairs that were "sent".
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for FakeSender {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl PushSender for FakeSender {
    async fn send(&self, title: &str, text: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), text.to_string()));
        self.succeed
    }
}
