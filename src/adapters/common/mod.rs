//! Building blocks shared by every gateway adapter.
//!
//! Each adapter supplies its own tables (currencies, statuses, channels) and
//! error-message extractor; the logic that consumes them lives here.

pub mod amounts;
pub mod error_classifier;
pub mod gateway_config;
pub mod http_client;
pub mod status_map;

pub use amounts::{AmountUnit, CurrencyRule};
pub use gateway_config::{GatewayConfig, DEFAULT_TIMEOUT};
pub use http_client::{decode, AuthScheme, GatewayHttpClient};
pub use status_map::{ChannelTable, StatusTable};

use chrono::{DateTime, Utc};

use crate::domain::payment::{Currency, ParseCurrencyError, PaymentError, PaymentResult};

/// Parse an RFC 3339 timestamp from a gateway, ignoring malformed values.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a currency code reported by a gateway.
pub(crate) fn parse_currency(gateway: &str, raw: &str) -> PaymentResult<Currency> {
    raw.parse().map_err(|e: ParseCurrencyError| {
        PaymentError::invalid_response(format!("{} reported {}", gateway, e)).with_gateway(gateway)
    })
}
