//! Request types for the unified gateway contract.
//!
//! Requests are built once per call and are never modified by adapters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{PaymentError, PaymentResult};
use super::money::Money;
use super::status::PaymentChannel;

/// Paying customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Required by every gateway.
    pub email: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub phone: Option<String>,

    pub metadata: Option<Value>,
}

impl Customer {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            phone: None,
            metadata: None,
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// First and last name joined, if either is present.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Request to start a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentRequest {
    pub amount: Money,

    pub customer: Customer,

    /// Generated by the adapter when absent.
    pub reference: Option<String>,

    /// Where the gateway redirects the customer afterwards.
    pub callback_url: Option<String>,

    /// Restrict the payment page to these channels.
    pub channels: Option<Vec<PaymentChannel>>,

    pub metadata: Option<Value>,

    pub description: Option<String>,
}

impl InitiatePaymentRequest {
    pub fn new(amount: Money, customer: Customer) -> Self {
        Self {
            amount,
            customer,
            reference: None,
            callback_url: None,
            channels: None,
            metadata: None,
            description: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn with_channels(mut self, channels: Vec<PaymentChannel>) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Field checks that do not depend on the gateway.
    pub fn validate(&self) -> PaymentResult<()> {
        if self.customer.email.trim().is_empty() {
            return Err(PaymentError::validation("Customer email is required"));
        }
        if !self.amount.is_positive() {
            return Err(PaymentError::validation(format!(
                "Amount must be greater than zero, got {}",
                self.amount
            )));
        }
        if let Some(reference) = &self.reference {
            validate_reference(reference)?;
        }
        Ok(())
    }
}

/// Request to check the state of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub reference: String,
}

impl VerifyPaymentRequest {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// Request to fetch a payment with its authorization details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPaymentRequest {
    pub reference: String,
}

impl GetPaymentRequest {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// Request to refund a payment, fully or partially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPaymentRequest {
    pub reference: String,

    /// Partial refund amount; full refund when `None`.
    pub amount: Option<Money>,

    pub reason: Option<String>,

    pub metadata: Option<Value>,
}

impl RefundPaymentRequest {
    pub fn full(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            amount: None,
            reason: None,
            metadata: None,
        }
    }

    pub fn partial(reference: impl Into<String>, amount: Money) -> Self {
        Self {
            amount: Some(amount),
            ..Self::full(reference)
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn validate(&self) -> PaymentResult<()> {
        validate_reference(&self.reference)?;
        if let Some(amount) = &self.amount {
            if !amount.is_positive() {
                return Err(PaymentError::validation(format!(
                    "Refund amount must be greater than zero, got {}",
                    amount
                )));
            }
        }
        Ok(())
    }
}

/// Request to cancel a payment that has not completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelPaymentRequest {
    pub reference: String,
    pub reason: Option<String>,
}

impl CancelPaymentRequest {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// References end up in URL paths and search queries.
pub fn validate_reference(reference: &str) -> PaymentResult<()> {
    if reference.trim().is_empty() {
        return Err(PaymentError::validation("Payment reference is required"));
    }
    if reference.contains(|c: char| {
        c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '\'' | '?' | '#' | '%')
    }) {
        return Err(PaymentError::validation(format!(
            "Payment reference '{}' contains invalid characters",
            reference
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{Currency, PaymentErrorKind};
    use rust_decimal_macros::dec;

    fn naira(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::NGN)
    }

    #[test]
    fn full_name_joins_present_parts() {
        let customer = Customer::new("ada@example.com").with_name("Ada", "Obi");
        assert_eq!(customer.full_name().as_deref(), Some("Ada Obi"));

        let mut first_only = Customer::new("ada@example.com");
        first_only.first_name = Some("Ada".into());
        assert_eq!(first_only.full_name().as_deref(), Some("Ada"));

        assert_eq!(Customer::new("x@example.com").full_name(), None);
    }

    #[test]
    fn initiate_requires_email() {
        let request = InitiatePaymentRequest::new(naira(dec!(100)), Customer::new("  "));
        let err = request.validate().unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::Validation);
    }

    #[test]
    fn initiate_requires_positive_amount() {
        let request = InitiatePaymentRequest::new(naira(dec!(0)), Customer::new("a@b.co"));
        assert!(request.validate().is_err());
    }

    #[test]
    fn initiate_rejects_reference_with_slash() {
        let request = InitiatePaymentRequest::new(naira(dec!(10)), Customer::new("a@b.co"))
            .with_reference("abc/def");
        assert!(request.validate().is_err());
    }

    #[test]
    fn reference_rejects_url_delimiters() {
        for reference in ["OTHER?ref=MINE", "REF#1", "REF%2F1", "a\\b", "tab\tref"] {
            let err = validate_reference(reference).unwrap_err();
            assert_eq!(err.kind, PaymentErrorKind::Validation, "{}", reference);
        }

        assert!(validate_reference("PSK_ORDER-1.2=3").is_ok());
    }

    #[test]
    fn refund_partial_must_be_positive() {
        let request = RefundPaymentRequest::partial("ref_1", naira(dec!(-5)));
        assert_eq!(request.validate().unwrap_err().kind, PaymentErrorKind::Validation);

        assert!(RefundPaymentRequest::full("ref_1").validate().is_ok());
    }
}
