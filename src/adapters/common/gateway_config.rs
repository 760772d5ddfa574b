//! Per-adapter connection settings.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::payment::{PaymentError, PaymentResult};

/// Default per-request timeout for every gateway.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and endpoint for one gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway secret key (sk_live_..., FLWSECK-...).
    secret_key: SecretString,

    /// API base URL, without a trailing slash.
    base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

/// Shape of a registration's opaque `config` value.
#[derive(Debug, Default, Deserialize)]
struct RegistrationSettings {
    #[serde(default)]
    secret_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl GatewayConfig {
    pub fn new(secret_key: impl Into<String>, default_base_url: &str) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            base_url: default_base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom API base URL (for testing or sandboxes).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `secret_key`, `base_url` and `timeout_secs` from a registration.
    ///
    /// A missing key yields an empty secret; the adapter constructor decides
    /// whether that is acceptable.
    pub fn from_registration(config: &Value, default_base_url: &str) -> PaymentResult<Self> {
        let settings: RegistrationSettings = if config.is_null() {
            RegistrationSettings::default()
        } else {
            serde_json::from_value(config.clone()).map_err(|e| {
                PaymentError::configuration(format!("Invalid gateway config: {}", e))
            })?
        };

        let mut gateway_config =
            Self::new(settings.secret_key.unwrap_or_default(), default_base_url);

        if let Some(url) = settings.base_url.filter(|u| !u.trim().is_empty()) {
            gateway_config = gateway_config.with_base_url(url);
        }
        if let Some(secs) = settings.timeout_secs {
            gateway_config = gateway_config.with_timeout(Duration::from_secs(secs));
        }

        Ok(gateway_config)
    }

    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    /// Whether a non-blank secret key is configured.
    pub fn has_secret(&self) -> bool {
        !self.secret_key.expose_secret().trim().is_empty()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
