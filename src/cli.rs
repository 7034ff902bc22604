//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the bridge binary
//! using the `clap` crate. These arguments are parsed at startup and then
//! merged with the configuration from the TOML file and environment
//! variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Forwards host notice events to the WxPusher push-notification API.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// WxPusher recipient UUID.
    #[arg(long, value_name = "UUID")]
    pub uuid: Option<String>,

    /// WxPusher application token.
    #[arg(long, value_name = "TOKEN")]
    pub apptoken: Option<String>,

    /// Enable forwarding regardless of the configured flag.
    #[arg(long)]
    pub enabled: bool,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if let Some(uuid) = &self.uuid {
            dict.insert("plugin.uuid".into(), Value::from(uuid.clone()));
        }

        if let Some(apptoken) = &self.apptoken {
            dict.insert("plugin.apptoken".into(), Value::from(apptoken.clone()));
        }

        // The `enabled` flag is special: its absence must not override a
        // `true` loaded from the file, so only the set case is merged.
        if self.enabled {
            dict.insert("plugin.enabled".into(), Value::from(true));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
