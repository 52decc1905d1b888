//! Application configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. optional `parkcard.toml` (or the file named by `--config`)
//! 3. `PARKCARD_*` environment variables, after `.env` is loaded
//!
//! Nested keys use `__` in environment variable names.

use std::time::Duration;

use parkcard_service::WorkerConfig;
use parkcard_storage::DatabaseConfig;
use serde::Deserialize;

/// Default config file stem looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "parkcard";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: String,

    /// Connection pool size.
    pub max_connections: u32,

    /// Worker queue poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// How often `serve` re-reads the stored reader settings, in milliseconds.
    pub settings_watch_ms: u64,

    /// Default tracing filter; `RUST_LOG` wins when set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "parkcard.db".to_string(),
            max_connections: 5,
            poll_interval_ms: 50,
            settings_watch_ms: 1000,
            log_filter: "parkcard=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `.env`, the config file and the environment.
    pub fn load(config_file: &str) -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_file).required(false))
            .add_source(
                config::Environment::with_prefix("PARKCARD")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        let config = builder.build()?.try_deserialize::<Self>()?;
        if config.poll_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        if config.settings_watch_ms == 0 {
            return Err(config::ConfigError::Message(
                "settings_watch_ms must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_path).max_connections(self.max_connections)
    }

    pub fn worker(&self) -> WorkerConfig {
        WorkerConfig::default().with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    pub fn settings_watch_interval(&self) -> Duration {
        Duration::from_millis(self.settings_watch_ms)
    }
}
