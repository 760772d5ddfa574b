//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::error::ValidationError;
use crate::ports::GatewayRegistration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Gateway selection and per-gateway credentials
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaysConfig {
    /// Gateway used when a caller names none
    #[serde(default)]
    pub default_gateway: Option<String>,

    /// Try other ready gateways when the chosen one is unavailable
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,

    /// Per-request timeout applied to every gateway, in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub paystack: ProviderConfig,

    #[serde(default)]
    pub flutterwave: ProviderConfig,

    #[serde(default)]
    pub stripe: ProviderConfig,
}

/// Settings for one gateway
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub secret_key: Option<SecretString>,

    /// Override of the gateway's public API URL
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Fallback priority; each gateway has its own default
    #[serde(default)]
    pub priority: Option<i32>,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GatewaysConfig {
    fn default() -> Self {
        Self {
            default_gateway: None,
            fallback_enabled: true,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            paystack: ProviderConfig::default(),
            flutterwave: ProviderConfig::default(),
            stripe: ProviderConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            base_url: None,
            enabled: true,
            priority: None,
        }
    }
}

impl ProviderConfig {
    /// Whether a non-blank secret key is set
    pub fn has_secret(&self) -> bool {
        self.secret_key
            .as_ref()
            .map(|key| !key.expose_secret().trim().is_empty())
            .unwrap_or(false)
    }

    fn secret_has_prefix(&self, prefix: &str) -> bool {
        self.secret_key
            .as_ref()
            .map(|key| key.expose_secret().starts_with(prefix))
            .unwrap_or(false)
    }
}

impl GatewaysConfig {
    /// Names and settings of the three built-in gateways, with their default
    /// priorities.
    fn providers(&self) -> [(&'static str, &ProviderConfig, i32); 3] {
        [
            ("paystack", &self.paystack, 100),
            ("flutterwave", &self.flutterwave, 90),
            ("stripe", &self.stripe, 80),
        ]
    }

    /// One registration per gateway with a configured secret key.
    ///
    /// Gateways without a key are left out rather than registered unready.
    pub fn registrations(&self) -> Vec<GatewayRegistration> {
        self.providers()
            .into_iter()
            .filter(|(_, provider, _)| provider.has_secret())
            .map(|(name, provider, default_priority)| {
                GatewayRegistration::new(name, self.registration_config(provider))
                    .with_enabled(provider.enabled)
                    .with_priority(provider.priority.unwrap_or(default_priority))
            })
            .collect()
    }

    fn registration_config(&self, provider: &ProviderConfig) -> Value {
        let mut config = Map::new();
        if let Some(key) = &provider.secret_key {
            config.insert("secret_key".into(), json!(key.expose_secret()));
        }
        if let Some(url) = &provider.base_url {
            config.insert("base_url".into(), json!(url));
        }
        config.insert("timeout_secs".into(), json!(self.request_timeout_secs));
        Value::Object(config)
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }

        if let Some(name) = &self.default_gateway {
            let known = self
                .providers()
                .iter()
                .any(|(provider, _, _)| *provider == name.as_str());
            if !known {
                return Err(ValidationError::UnknownDefaultGateway(name.clone()));
            }
        }

        // Verify key prefixes for safety
        if self.paystack.has_secret() && !self.paystack.secret_has_prefix("sk_") {
            return Err(ValidationError::InvalidSecretKey("Paystack"));
        }
        if self.flutterwave.has_secret() && !self.flutterwave.secret_has_prefix("FLWSECK") {
            return Err(ValidationError::InvalidSecretKey("Flutterwave"));
        }
        if self.stripe.has_secret() && !self.stripe.secret_has_prefix("sk_") {
            return Err(ValidationError::InvalidSecretKey("Stripe"));
        }

        Ok(())
    }
}
