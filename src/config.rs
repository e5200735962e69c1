//! Configuration management for deploy-notify
//!
//! Settings are layered with `figment`: built-in defaults, an optional TOML
//! file, `DEPLOY_NOTIFY_`-prefixed environment variables, and finally the
//! bare `SLACK_WEBHOOK_URL` variable that deployment pipelines already set.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::event::DEFAULT_TIMESTAMP_LABEL;

/// Environment variable holding the webhook endpoint.
pub const WEBHOOK_URL_ENV: &str = "SLACK_WEBHOOK_URL";

/// The main configuration struct for the notifier.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// The logging level used by [`crate::telemetry::init_tracing`].
    pub log_level: String,
    /// The incoming webhook URL. Missing or empty fails every dispatch.
    pub webhook_url: Option<String>,
    /// Label appended to generated `DEPLOY_TIMESTAMP` values.
    pub timestamp_label: String,
}

impl Config {
    /// Loads the configuration, optionally reading a TOML file first.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            // e.g. DEPLOY_NOTIFY_TIMESTAMP_LABEL=UTC
            .merge(Env::prefixed("DEPLOY_NOTIFY_"))
            .merge(Env::raw().only(&[WEBHOOK_URL_ENV]).map(|_| "webhook_url".into()))
            .extract()?;
        Ok(config)
    }

    /// Loads the configuration from the environment alone.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            webhook_url: None,
            timestamp_label: DEFAULT_TIMESTAMP_LABEL.to_string(),
        }
    }
}
