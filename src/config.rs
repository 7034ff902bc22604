//! Configuration management for the WxPusher bridge.
//!
//! Two layers of configuration exist. `AppConfig` is the process-level
//! configuration, loaded once at startup by layering sources with `figment`
//! (defaults, TOML file, environment, CLI). `PluginConfig` is the
//! user-mutable plugin state, persisted through a [`ConfigStore`] so flag
//! reconciliation (the self-resetting test trigger) survives restarts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::types::NotificationType;

/// The user-facing plugin configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PluginConfig {
    /// Master switch. Nothing is forwarded while this is off.
    #[serde(default)]
    pub enabled: bool,
    /// One-shot test trigger. Fires a single test send at initialization and
    /// is forced back to `false` before being persisted.
    #[serde(default)]
    pub onlyonce: bool,
    /// WxPusher recipient UUID.
    #[serde(default)]
    pub uuid: String,
    /// WxPusher application token.
    #[serde(default)]
    pub apptoken: String,
    /// Message-type allowlist. Empty means forward all types.
    #[serde(default)]
    pub msgtypes: Vec<NotificationType>,
}

impl PluginConfig {
    /// Whether both credentials required for sending are present.
    pub fn has_credentials(&self) -> bool {
        !self.uuid.is_empty() && !self.apptoken.is_empty()
    }

    /// Whether the given type passes the allowlist. An empty allowlist
    /// allows everything; an absent type is never filtered.
    pub fn allows(&self, msg_type: Option<NotificationType>) -> bool {
        match msg_type {
            Some(msg_type) => self.msgtypes.is_empty() || self.msgtypes.contains(&msg_type),
            None => true,
        }
    }
}

/// The process-level configuration for the bridge binary.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// The logging level for the application.
    pub log_level: String,
    /// Where the persisted plugin configuration lives.
    pub state_path: PathBuf,
    /// Initial plugin settings, used to seed the store on first run.
    #[serde(default)]
    pub plugin: PluginConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            state_path: PathBuf::from("wxpusher-bridge.json"),
            plugin: PluginConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the application configuration by layering sources: defaults,
    /// file, environment, and CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("wxpusher-bridge.toml"));
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g.
            // WXPUSHER_PLUGIN__APPTOKEN=...
            .merge(Env::prefixed("WXPUSHER_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

/// The host's persistent key-value store for plugin settings.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self) -> Result<PluginConfig>;
    async fn save(&self, config: &PluginConfig) -> Result<()>;
}

/// A `ConfigStore` backed by a JSON file on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn load(&self) -> Result<PluginConfig> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read config from {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse config at {}", self.path.display()))
    }

    async fn save(&self, config: &PluginConfig) -> Result<()> {
        let body = serde_json::to_vec_pretty(config)?;
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("failed to write config to {}", self.path.display()))
    }
}

/// An in-memory `ConfigStore` for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: std::sync::Arc<std::sync::Mutex<PluginConfig>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MemoryStore {
    pub fn with_config(config: PluginConfig) -> Self {
        Self {
            inner: std::sync::Arc::new(std::sync::Mutex::new(config)),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load(&self) -> Result<PluginConfig> {
        Ok(self.inner.lock().unwrap().clone())
    }

    async fn save(&self, config: &PluginConfig) -> Result<()> {
        *self.inner.lock().unwrap() = config.clone();
        Ok(())
    }
}
