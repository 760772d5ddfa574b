//! Stripe API objects used by the payment-intent flow.
//!
//! These types cover the fields the adapter reads. Unknown fields are ignored
//! so that Stripe API upgrades do not break parsing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

// ════════════════════════════════════════════════════════════════════════════════
// Payment Intents
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    /// Stripe's own id (pi_...). Not the caller's reference.
    pub id: String,

    /// Minor units, or major units for zero-decimal currencies.
    pub amount: Decimal,

    /// Lowercase ISO code.
    pub currency: String,

    pub status: String,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// Unix seconds.
    #[serde(default)]
    pub created: Option<i64>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,

    #[serde(default)]
    pub receipt_email: Option<String>,

    #[serde(default)]
    pub payment_method_types: Vec<String>,

    #[serde(default)]
    pub latest_charge: Option<StripeLatestCharge>,

    #[serde(default)]
    pub last_payment_error: Option<StripeApiError>,
}

impl StripePaymentIntent {
    /// The expanded charge, when the request asked for it.
    pub fn charge(&self) -> Option<&StripeCharge> {
        match &self.latest_charge {
            Some(StripeLatestCharge::Expanded(charge)) => Some(charge),
            _ => None,
        }
    }

    /// Intents in these states can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self.status.as_str(),
            "requires_payment_method" | "requires_confirmation" | "requires_action" | "requires_capture"
        )
    }
}

/// `latest_charge` is an id unless expanded.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StripeLatestCharge {
    Id(String),
    Expanded(Box<StripeCharge>),
}

/// `GET /v1/payment_intents/search` result page.
#[derive(Debug, Deserialize)]
pub struct StripeSearchResult<T> {
    pub data: Vec<T>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Charges
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct StripeCharge {
    pub id: String,

    /// Unix seconds.
    pub created: i64,

    #[serde(default)]
    pub failure_message: Option<String>,

    #[serde(default)]
    pub outcome: Option<StripeChargeOutcome>,

    #[serde(default)]
    pub billing_details: Option<StripeBillingDetails>,

    #[serde(default)]
    pub payment_method_details: Option<StripePaymentMethodDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeChargeOutcome {
    #[serde(default)]
    pub seller_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeBillingDetails {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentMethodDetails {
    #[serde(rename = "type")]
    pub method_type: String,

    #[serde(default)]
    pub card: Option<StripeCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeCard {
    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub last4: Option<String>,

    #[serde(default)]
    pub exp_month: Option<u32>,

    #[serde(default)]
    pub exp_year: Option<u32>,

    /// credit, debit, prepaid.
    #[serde(default)]
    pub funding: Option<String>,

    #[serde(default)]
    pub country: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Refunds and errors
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct StripeRefund {
    /// re_...
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn latest_charge_as_id() {
        let intent: StripePaymentIntent = serde_json::from_value(json!({
            "id": "pi_123",
            "amount": 5000,
            "currency": "usd",
            "status": "requires_payment_method",
            "latest_charge": "ch_123"
        }))
        .unwrap();

        assert!(intent.charge().is_none());
        assert!(intent.is_cancellable());
    }

    #[test]
    fn latest_charge_expanded() {
        let intent: StripePaymentIntent = serde_json::from_value(json!({
            "id": "pi_123",
            "amount": 5000,
            "currency": "usd",
            "status": "succeeded",
            "metadata": {"reference": "STR_1_abcd1234"},
            "latest_charge": {
                "id": "ch_123",
                "created": 1705314600,
                "paid": true,
                "outcome": {"seller_message": "Payment complete."},
                "payment_method_details": {
                    "type": "card",
                    "card": {"brand": "visa", "last4": "4242", "exp_month": 12, "exp_year": 2030, "funding": "credit", "country": "US"}
                }
            }
        }))
        .unwrap();

        let charge = intent.charge().unwrap();
        assert_eq!(charge.id, "ch_123");
        assert_eq!(
            charge.payment_method_details.as_ref().unwrap().card.as_ref().unwrap().last4.as_deref(),
            Some("4242")
        );
        assert_eq!(intent.metadata["reference"], "STR_1_abcd1234");
        assert!(!intent.is_cancellable());
    }
}
