//! Flutterwave v3 API objects.
//!
//! Responses are wrapped in `{status, message, data}` where `status` is the
//! string `"success"` or `"error"`. Amounts are in major units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ════════════════════════════════════════════════════════════════════════════════
// Envelope
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct FlutterwaveEnvelopeHead {
    pub status: String,

    #[serde(default)]
    pub message: String,
}

impl FlutterwaveEnvelopeHead {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /payments` (hosted checkout).
#[derive(Debug, Serialize)]
pub struct FlutterwavePaymentBody {
    pub tx_ref: String,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,

    pub currency: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    /// Comma-separated list, e.g. `"card,banktransfer"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_options: Option<String>,

    pub customer: FlutterwaveCustomerBody,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizations: Option<FlutterwaveCustomizations>,
}

#[derive(Debug, Serialize)]
pub struct FlutterwaveCustomerBody {
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonenumber: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FlutterwaveCustomizations {
    pub description: String,
}

/// Body of `POST /refunds`.
#[derive(Debug, Serialize)]
pub struct FlutterwaveRefundBody {
    pub id: i64,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// `data` of `POST /payments`.
#[derive(Debug, Deserialize)]
pub struct FlutterwavePaymentLink {
    pub link: String,
}

/// `data` of `GET /transactions/verify_by_reference`.
#[derive(Debug, Deserialize)]
pub struct FlutterwaveTransaction {
    pub id: i64,
    pub tx_ref: String,

    #[serde(default)]
    pub flw_ref: Option<String>,

    pub amount: Decimal,
    pub currency: String,
    pub status: String,

    #[serde(default)]
    pub payment_type: Option<String>,

    #[serde(default)]
    pub processor_response: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub customer: Option<FlutterwaveCustomer>,

    #[serde(default)]
    pub card: Option<FlutterwaveCard>,

    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct FlutterwaveCustomer {
    pub email: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlutterwaveCard {
    #[serde(default)]
    pub first_6digits: Option<String>,

    #[serde(default)]
    pub last_4digits: Option<String>,

    #[serde(default)]
    pub issuer: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default, rename = "type")]
    pub card_type: Option<String>,

    /// `MM/YY`.
    #[serde(default)]
    pub expiry: Option<String>,

    #[serde(default)]
    pub token: Option<String>,
}

/// `data` of `POST /refunds`.
#[derive(Debug, Deserialize)]
pub struct FlutterwaveRefund {
    pub id: i64,

    #[serde(default)]
    pub amount_refunded: Option<Decimal>,

    pub status: String,
}
