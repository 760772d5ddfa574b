//! Payment gateway port.
//!
//! The single contract every payment processor adapter implements. Callers
//! (controllers, wallet services) depend on this trait and the gateway manager
//! only, and never shape requests differently per processor.
//!
//! # Design
//!
//! - **Returned failures**: the five payment operations report every failure
//!   as `Err(PaymentError)`; none of them panic.
//! - **No retries**: one call is one outbound request. Retry policy belongs to
//!   the caller.
//! - **Stateless**: adapters hold configuration and an HTTP client only, so a
//!   single instance is shared for the lifetime of the process.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::payment::{
    CancelPaymentRequest, CancelPaymentResponse, GetPaymentRequest, GetPaymentResponse,
    InitiatePaymentRequest, InitiatePaymentResponse, PaymentError, PaymentResult,
    RefundPaymentRequest, RefundPaymentResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Port for payment processor integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a payment.
    ///
    /// Generates a reference when the request has none, converts the amount to
    /// the processor's wire unit and returns a `Pending` result with whatever
    /// redirect or client token the processor provides.
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> PaymentResult<InitiatePaymentResponse>;

    /// Look up a payment by reference and map its status.
    async fn verify_payment(
        &self,
        request: VerifyPaymentRequest,
    ) -> PaymentResult<VerifyPaymentResponse>;

    /// Verification plus authorization and card details when available.
    async fn get_payment(&self, request: GetPaymentRequest) -> PaymentResult<GetPaymentResponse>;

    /// Refund a payment. Full refund when `request.amount` is `None`.
    async fn refund_payment(
        &self,
        request: RefundPaymentRequest,
    ) -> PaymentResult<RefundPaymentResponse>;

    /// Cancel a payment.
    ///
    /// Optional capability. Processors without a cancel endpoint may report the
    /// current status with `cancelled = false`; that is not a guarantee that
    /// funds never moved.
    async fn cancel_payment(
        &self,
        request: CancelPaymentRequest,
    ) -> PaymentResult<CancelPaymentResponse> {
        let _ = request;
        Err(PaymentError::unsupported_operation(
            "cancel_payment",
            self.gateway_name(),
        ))
    }

    /// Registry name of this gateway ("paystack", "flutterwave", ...).
    fn gateway_name(&self) -> &str;

    /// Whether the required credential is present. Does not touch the network.
    fn is_ready(&self) -> bool;
}

/// Constructor for an adapter from its registration.
///
/// Construction is the one place a gateway may refuse to exist: a missing
/// credential yields a `Configuration` error.
pub type GatewayFactory =
    Arc<dyn Fn(&GatewayRegistration) -> PaymentResult<Arc<dyn PaymentGateway>> + Send + Sync>;

/// Named, prioritized gateway configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayRegistration {
    pub name: String,

    /// Opaque per-processor configuration, read by the gateway's factory.
    pub config: Value,

    pub enabled: bool,

    /// Higher is tried first during fallback.
    pub priority: i32,
}

impl GatewayRegistration {
    pub fn new(name: impl Into<String>, config: Value) -> Self {
        Self {
            name: name.into(),
            config,
            enabled: true,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn registration_defaults() {
        let registration = GatewayRegistration::new("paystack", json!({"secret_key": "sk_test"}));
        assert!(registration.enabled);
        assert_eq!(registration.priority, 0);

        let registration = registration.with_priority(100).with_enabled(false);
        assert_eq!(registration.priority, 100);
        assert!(!registration.enabled);
    }
}
