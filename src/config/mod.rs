//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PAYMENT_GATEWAYS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use payment_gateways::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Default gateway: {:?}", config.gateways.default_gateway);
//! ```

mod error;
mod gateways;
mod logging;

pub use error::{ConfigError, ValidationError};
pub use gateways::{GatewaysConfig, ProviderConfig};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Every section has defaults, so an empty environment loads successfully
/// with no gateways configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Gateway credentials, priorities and selection policy
    #[serde(default)]
    pub gateways: GatewaysConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PAYMENT_GATEWAYS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PAYMENT_GATEWAYS__GATEWAYS__DEFAULT_GATEWAY=paystack` -> `gateways.default_gateway`
    /// - `PAYMENT_GATEWAYS__GATEWAYS__STRIPE__SECRET_KEY=...` -> `gateways.stripe.secret_key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMENT_GATEWAYS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Request timeout bounds
    /// - Default gateway is a known gateway
    /// - Secret key prefixes
    /// - Log level
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gateways.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
