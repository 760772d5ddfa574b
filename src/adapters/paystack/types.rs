//! Paystack API objects as they arrive on the wire.
//!
//! Every Paystack response is wrapped in `{status, message, data}`; `status`
//! is a boolean and `false` means the call failed even on HTTP 200.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

// ════════════════════════════════════════════════════════════════════════════════
// Envelope
// ════════════════════════════════════════════════════════════════════════════════

/// The part of the envelope read before `data` is decoded.
#[derive(Debug, Deserialize)]
pub struct PaystackEnvelopeHead {
    pub status: bool,

    #[serde(default)]
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Transactions
// ════════════════════════════════════════════════════════════════════════════════

/// `data` of `POST /transaction/initialize`.
#[derive(Debug, Deserialize)]
pub struct PaystackInitializeData {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// `data` of `GET /transaction/verify/{reference}` and `GET /transaction/{reference}`.
#[derive(Debug, Deserialize)]
pub struct PaystackTransaction {
    pub id: i64,
    pub status: String,
    pub reference: String,

    /// Minor units (kobo, pesewas, cents).
    pub amount: Decimal,

    pub currency: String,

    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default)]
    pub gateway_response: Option<String>,

    #[serde(default)]
    pub paid_at: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub customer: Option<PaystackCustomer>,

    #[serde(default)]
    pub authorization: Option<PaystackAuthorization>,

    /// Object, or an empty string when the payment carried none.
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PaystackCustomer {
    pub email: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaystackAuthorization {
    #[serde(default)]
    pub authorization_code: Option<String>,

    #[serde(default)]
    pub bin: Option<String>,

    #[serde(default)]
    pub last4: Option<String>,

    #[serde(default)]
    pub exp_month: Option<String>,

    #[serde(default)]
    pub exp_year: Option<String>,

    #[serde(default)]
    pub card_type: Option<String>,

    /// Issuing bank name.
    #[serde(default)]
    pub bank: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub reusable: Option<bool>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Refunds
// ════════════════════════════════════════════════════════════════════════════════

/// `data` of `POST /refund`.
#[derive(Debug, Deserialize)]
pub struct PaystackRefund {
    pub id: i64,
    pub status: String,

    /// Minor units.
    pub amount: Decimal,

    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_verify_payload() {
        let json = r#"{
            "id": 4099260516,
            "domain": "test",
            "status": "success",
            "reference": "re4lyvq3s3",
            "amount": 40333,
            "gateway_response": "Successful",
            "paid_at": "2024-08-22T09:15:02.000Z",
            "created_at": "2024-08-22T09:14:24.000Z",
            "channel": "card",
            "currency": "NGN",
            "metadata": "",
            "authorization": {
                "authorization_code": "AUTH_uh8bcl3zbn",
                "bin": "408408",
                "last4": "4081",
                "exp_month": "12",
                "exp_year": "2030",
                "card_type": "visa ",
                "bank": "TEST BANK",
                "country_code": "NG",
                "brand": "visa",
                "reusable": true
            },
            "customer": {
                "id": 181873746,
                "first_name": null,
                "last_name": null,
                "email": "demo@test.com",
                "phone": null
            }
        }"#;

        let tx: PaystackTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, dec!(40333));
        assert_eq!(tx.customer.unwrap().email, "demo@test.com");
        assert_eq!(tx.authorization.unwrap().last4.as_deref(), Some("4081"));
        assert_eq!(tx.metadata, Some(Value::String(String::new())));
    }

    #[test]
    fn parses_failed_envelope_head() {
        let head: PaystackEnvelopeHead =
            serde_json::from_str(r#"{"status": false, "message": "Invalid key"}"#).unwrap();
        assert!(!head.status);
        assert_eq!(head.message, "Invalid key");
    }
}
