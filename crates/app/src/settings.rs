//! Runtime settings for the expense tracker.
//!
//! Values come from an optional `settings.toml` (or the file given with
//! `--config`), overridden by environment variables such as `PORT` or
//! `DEV_AUTH_TOKEN`. Empty variables are ignored.
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub bind: String,
    pub app_env: String,
    pub dev_auth_token: String,
    pub dev_auth_uid: String,
    pub log_level: String,
    /// Per-request deadline in milliseconds, `0` disables it.
    pub request_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind: "0.0.0.0".to_string(),
            app_env: "development".to_string(),
            dev_auth_token: "dev-token".to_string(),
            dev_auth_uid: "local-user".to_string(),
            log_level: "info".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn new(config_path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load(config_path, Environment::default())
    }

    pub fn load(config_path: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => File::with_name(path),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(env.try_parsing(true).ignore_empty(true))
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}
