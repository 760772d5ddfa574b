//! Currency-tagged decimal amounts.
//!
//! A [`Money`] amount is always in the caller's base unit (one naira, one
//! dollar). Conversion to a gateway's wire unit happens inside adapters and
//! produces a new scalar; `Money` values are never rewritten.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currencies understood by at least one gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    NGN,
    GHS,
    ZAR,
    KES,
    UGX,
    TZS,
    RWF,
    XOF,
    XAF,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    JPY,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::NGN => "NGN",
            Currency::GHS => "GHS",
            Currency::ZAR => "ZAR",
            Currency::KES => "KES",
            Currency::UGX => "UGX",
            Currency::TZS => "TZS",
            Currency::RWF => "RWF",
            Currency::XOF => "XOF",
            Currency::XAF => "XAF",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
        }
    }

    /// Number of decimal places used when displaying base amounts.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::UGX | Currency::RWF | Currency::XOF | Currency::XAF | Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown currency code '{0}'")]
pub struct ParseCurrencyError(pub String);

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    /// Case-insensitive: gateways answer with "usd" as often as "USD".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let currency = match s.trim().to_ascii_uppercase().as_str() {
            "NGN" => Currency::NGN,
            "GHS" => Currency::GHS,
            "ZAR" => Currency::ZAR,
            "KES" => Currency::KES,
            "UGX" => Currency::UGX,
            "TZS" => Currency::TZS,
            "RWF" => Currency::RWF,
            "XOF" => Currency::XOF,
            "XAF" => Currency::XAF,
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "GBP" => Currency::GBP,
            "CAD" => Currency::CAD,
            "AUD" => Currency::AUD,
            "JPY" => Currency::JPY,
            _ => return Err(ParseCurrencyError(s.to_string())),
        };
        Ok(currency)
    }
}

/// An amount in base units tagged with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.currency.decimal_places() as usize;
        write!(f, "{:.*} {}", places, self.amount, self.currency)
    }
}
