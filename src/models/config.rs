//! Configuration model loaded from external sources.

use std::env;

use config::{Config, ConfigError};
use serde::Deserialize;

use crate::domain::reminder::ReminderPolicy;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Root of the booking REST backend, e.g. `https://api.example.com/api`.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Lifetime of cached GET responses; `0` disables the cache.
    pub cache_ttl_secs: u64,
    pub slot_step_minutes: u16,
    pub reminders: ReminderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReminderConfig {
    pub poll_interval_secs: u64,
    pub buffer_minutes: i64,
    pub tolerance_minutes: i64,
    pub snooze_minutes: i64,
    /// Staff account used by the `charge_reminders` worker.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ReminderConfig {
    pub fn policy(&self) -> ReminderPolicy {
        ReminderPolicy::from_minutes(
            self.buffer_minutes,
            self.tolerance_minutes,
            self.snooze_minutes,
        )
    }
}

/// Reads `config/default.yaml`, the `APP_ENV` profile and `APP_*` variables.
///
/// Nested keys use a double underscore: `APP_REMINDERS__EMAIL`.
pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
