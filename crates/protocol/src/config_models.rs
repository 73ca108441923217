//! Global configuration models for `.fitkit/config.toml`.
//!
//! This module defines the structure of the configuration file that
//! selects the persistence backend and tunes logging and the rest timer.

use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;
use ts_rs::TS;

/// Default interval between rest countdown ticks.
pub const DEFAULT_TICK_MILLIS: u64 = 1000;

/// Represents global settings from `.fitkit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .fitkit/config.toml
/// tick-millis = 1000
///
/// [backend]
/// url = "https://project.supabase.co"
/// api-key-env = "FITKIT_API_KEY"
///
/// [logging]
/// level = "debug"
/// format = "compact"
/// file = "fitkit.log"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Hosted backend to talk to. When absent, the local in-memory store
    /// seeded from `.fitkit/routines/` is used.
    #[serde(default)]
    pub backend: Option<BackendConfig>,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// Interval between rest countdown ticks, in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

fn default_tick_millis() -> u64 {
    DEFAULT_TICK_MILLIS
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            backend: None,
            logging: LoggingSettings::default(),
            tick_millis: DEFAULT_TICK_MILLIS,
        }
    }
}

/// Connection settings for the hosted backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct BackendConfig {
    /// Base URL of the project, without the `/rest/v1` suffix.
    pub url: String,

    /// Name of the environment variable holding the public API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_key_env() -> String {
    "FITKIT_API_KEY".to_string()
}

/// Log output format.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Write logs to this file instead of stderr.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}
