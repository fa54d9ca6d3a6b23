//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file when
//! present) using the `config` and `dotenvy` crates. Variables carry the
//! `SAMARTH` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use samarth::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Serving on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod data;
mod error;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use data::DataConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads; whether it
/// validates depends on the chosen AI provider having a key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Reasoning engine configuration (Gemini/OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Dataset locations and summary limits
    #[serde(default)]
    pub data: DataConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `SAMARTH__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `SAMARTH__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key = ...`
    /// - `SAMARTH__DATA__DATA_DIR=/srv/data` -> `data.data_dir = /srv/data`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SAMARTH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.data.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
