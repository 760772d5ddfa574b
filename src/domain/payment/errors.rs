//! Error types for payment gateway operations.
//!
//! Every failure is a [`PaymentError`]: one closed [`PaymentErrorKind`] plus a
//! message and optional structured details. Callers branch on `kind`, never on
//! which gateway produced the error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Result alias used by every gateway operation.
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Error kinds, one per failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentErrorKind {
    /// Missing credential, unknown gateway, gateway not ready.
    Configuration,

    /// The gateway does not accept the requested currency.
    UnsupportedCurrency,

    /// Amount or field validation failed before any network call.
    Validation,

    /// The gateway answered with a malformed or unsuccessful payload.
    InvalidResponse,

    /// The reference could not be resolved to a gateway transaction.
    TransactionNotFound,

    /// The gateway does not implement the requested operation.
    UnsupportedOperation,

    /// A payment with this reference was already initiated.
    DuplicatePayment,

    /// Refund amount is not acceptable for the original payment.
    InvalidRefundAmount,

    /// The gateway returned an HTTP error status.
    GatewayError,

    /// The request to the gateway timed out.
    GatewayTimeout,

    /// Anything that could not be classified.
    Unknown,
}

impl PaymentErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentErrorKind::Configuration => "PAYMENT_CONFIGURATION_ERROR",
            PaymentErrorKind::UnsupportedCurrency => "UNSUPPORTED_CURRENCY",
            PaymentErrorKind::Validation => "PAYMENT_VALIDATION_ERROR",
            PaymentErrorKind::InvalidResponse => "PAYMENT_INVALID_RESPONSE",
            PaymentErrorKind::TransactionNotFound => "PAYMENT_NOT_FOUND",
            PaymentErrorKind::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            PaymentErrorKind::DuplicatePayment => "DUPLICATE_PAYMENT",
            PaymentErrorKind::InvalidRefundAmount => "INVALID_REFUND_AMOUNT",
            PaymentErrorKind::GatewayError => "PAYMENT_GATEWAY_ERROR",
            PaymentErrorKind::GatewayTimeout => "PAYMENT_GATEWAY_TIMEOUT",
            PaymentErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for PaymentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structured payment error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{kind}] {message}")]
pub struct PaymentError {
    /// Error category.
    pub kind: PaymentErrorKind,

    /// Human-readable message, passed through verbatim from the origin.
    pub message: String,

    /// Structured details (status code, response body, limits...).
    pub details: Option<Value>,

    /// Gateway that produced the error, when known.
    pub gateway: Option<String>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(kind: PaymentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            gateway: None,
        }
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the originating gateway name.
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Machine-readable code of this error.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::Configuration, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::Validation, message)
    }

    /// Currency not accepted; details list what is supported.
    pub fn unsupported_currency(currency: impl fmt::Display, supported: &[String]) -> Self {
        Self::new(
            PaymentErrorKind::UnsupportedCurrency,
            format!(
                "Currency {} is not supported. Supported currencies: {}",
                currency,
                supported.join(", ")
            ),
        )
        .with_details(json!({
            "currency": currency.to_string(),
            "supportedCurrencies": supported,
        }))
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::InvalidResponse, message)
    }

    pub fn not_found(reference: &str) -> Self {
        Self::new(
            PaymentErrorKind::TransactionNotFound,
            format!("Transaction with reference '{}' not found", reference),
        )
        .with_details(json!({ "reference": reference }))
    }

    pub fn unsupported_operation(operation: &str, gateway: &str) -> Self {
        Self::new(
            PaymentErrorKind::UnsupportedOperation,
            format!("{} is not supported by the {} gateway", operation, gateway),
        )
        .with_gateway(gateway)
    }

    pub fn duplicate_payment(reference: &str) -> Self {
        Self::new(
            PaymentErrorKind::DuplicatePayment,
            format!("A payment with reference '{}' already exists", reference),
        )
        .with_details(json!({ "reference": reference }))
    }

    pub fn invalid_refund_amount(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::InvalidRefundAmount, message)
    }

    /// HTTP error status returned by the gateway.
    pub fn gateway_error(message: impl Into<String>, status_code: u16, response: Value) -> Self {
        Self::new(PaymentErrorKind::GatewayError, message).with_details(json!({
            "statusCode": status_code,
            "response": response,
        }))
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::GatewayTimeout, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorKind::Unknown, message)
    }

    /// HTTP status code carried by a gateway error, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.details
            .as_ref()
            .and_then(|d| d.get("statusCode"))
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }

    /// Whether the failing call may succeed if the caller retries it.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            PaymentErrorKind::GatewayTimeout => true,
            PaymentErrorKind::GatewayError => {
                matches!(self.status_code(), Some(429) | Some(500..=599))
            }
            _ => false,
        }
    }

    /// Setup-time failures that no retry can fix.
    pub fn is_fatal(&self) -> bool {
        self.kind == PaymentErrorKind::Configuration
    }

    /// Whether this error means "the gateway does not know this reference".
    ///
    /// Gateways signal unknown references inconsistently: an explicit lookup
    /// miss, a 404, or a 400 whose body says the transaction was not found.
    pub fn is_not_found(&self) -> bool {
        match self.kind {
            PaymentErrorKind::TransactionNotFound => true,
            PaymentErrorKind::GatewayError => match self.status_code() {
                Some(404) => true,
                Some(400) => {
                    let in_message = self.message.to_lowercase().contains("not found");
                    let in_response = self
                        .details
                        .as_ref()
                        .and_then(|d| d.get("response"))
                        .map(|r| r.to_string().to_lowercase().contains("not found"))
                        .unwrap_or(false);
                    in_message || in_response
                }
                _ => false,
            },
            _ => false,
        }
    }
}
