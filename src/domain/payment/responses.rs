//! Response types for the unified gateway contract.
//!
//! Every successful response may carry `raw`, the gateway's own response body,
//! for callers that need fields the unified shape does not expose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::money::Money;
use super::requests::Customer;
use super::status::{PaymentChannel, PaymentStatus, RefundStatus};

/// Result of starting a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentResponse {
    pub reference: String,

    /// Always `Pending` right after initiation.
    pub status: PaymentStatus,

    /// The caller's amount, unchanged.
    pub amount: Money,

    /// Hosted payment page. `None` for client-secret flows.
    pub authorization_url: Option<String>,

    pub access_code: Option<String>,

    /// Token for client-side confirmation when there is no redirect.
    pub client_secret: Option<String>,

    /// The gateway's own identifier, when it differs from `reference`.
    pub gateway_transaction_id: Option<String>,

    pub raw: Option<Value>,
}

/// Current state of a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub reference: String,
    pub status: PaymentStatus,
    pub amount: Money,
    pub channel: Option<PaymentChannel>,
    pub paid_at: Option<DateTime<Utc>>,
    pub customer: Option<Customer>,
    pub gateway_transaction_id: Option<String>,

    /// Gateway's human-readable outcome ("Approved", "Insufficient funds"...).
    pub gateway_response: Option<String>,

    pub raw: Option<Value>,
}

/// Card or account authorization used for a payment.
///
/// Every field is optional: not every gateway or channel reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    pub authorization_code: Option<String>,
    pub bin: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<String>,
    pub exp_year: Option<String>,
    pub card_type: Option<String>,
    pub brand: Option<String>,
    pub issuer: Option<String>,
    pub country_code: Option<String>,
    pub reusable: Option<bool>,
}

impl PaymentAuthorization {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Full payment view: verification plus authorization details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPaymentResponse {
    #[serde(flatten)]
    pub verification: VerifyPaymentResponse,
    pub authorization: Option<PaymentAuthorization>,
    pub created_at: Option<DateTime<Utc>>,
    pub metadata: Option<Value>,
}

impl GetPaymentResponse {
    pub fn reference(&self) -> &str {
        &self.verification.reference
    }

    pub fn status(&self) -> PaymentStatus {
        self.verification.status
    }

    pub fn amount(&self) -> Money {
        self.verification.amount
    }
}

/// Result of a refund request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPaymentResponse {
    /// Reference of the refunded payment.
    pub reference: String,

    /// Gateway identifier of the refund itself.
    pub refund_reference: String,

    pub refunded_amount: Money,
    pub status: RefundStatus,
    pub raw: Option<Value>,
}

/// Result of a cancellation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelPaymentResponse {
    pub reference: String,

    pub status: PaymentStatus,

    /// `true` only when the gateway actually cancelled the payment. Gateways
    /// without a cancel endpoint report the current status with `false`, and
    /// funds may already have moved.
    pub cancelled: bool,

    pub raw: Option<Value>,
}
