//! Cross-gateway lookup for payments whose gateway is unknown.
//!
//! Asks each ready gateway in fallback order, one at a time, and returns the
//! first that knows the reference.

use std::future::Future;
use std::sync::Arc;

use crate::domain::payment::{
    GetPaymentRequest, GetPaymentResponse, PaymentError, PaymentResult, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
use crate::ports::PaymentGateway;

use super::GatewayManager;

/// Options for a cross-gateway scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions {
    /// Abort on the first error that is not a "not found" answer.
    pub stop_on_error: bool,
}

impl LookupOptions {
    pub fn stop_on_error() -> Self {
        Self { stop_on_error: true }
    }
}

/// A match: the gateway that answered and its response.
#[derive(Debug, Clone)]
pub struct LookupMatch<T> {
    pub gateway: String,
    pub response: T,
}

/// Verify `reference` against every ready gateway until one knows it.
pub async fn verify_across_gateways(
    manager: &GatewayManager,
    reference: &str,
    options: LookupOptions,
) -> PaymentResult<LookupMatch<VerifyPaymentResponse>> {
    scan(manager, reference, options, |gateway, reference| async move {
        gateway
            .verify_payment(VerifyPaymentRequest::new(reference))
            .await
    })
    .await
}

/// Like [`verify_across_gateways`], returning authorization details too.
pub async fn get_across_gateways(
    manager: &GatewayManager,
    reference: &str,
    options: LookupOptions,
) -> PaymentResult<LookupMatch<GetPaymentResponse>> {
    scan(manager, reference, options, |gateway, reference| async move {
        gateway.get_payment(GetPaymentRequest::new(reference)).await
    })
    .await
}

async fn scan<T, F, Fut>(
    manager: &GatewayManager,
    reference: &str,
    options: LookupOptions,
    call: F,
) -> PaymentResult<LookupMatch<T>>
where
    F: Fn(Arc<dyn PaymentGateway>, String) -> Fut,
    Fut: Future<Output = PaymentResult<T>>,
{
    let mut last_error: Option<PaymentError> = None;

    for (name, gateway) in manager.fallback_order() {
        match call(gateway, reference.to_string()).await {
            Ok(response) => {
                tracing::info!(gateway = %name, reference = %reference, "Payment found");
                return Ok(LookupMatch {
                    gateway: name,
                    response,
                });
            }
            Err(error) if error.is_not_found() => {
                tracing::debug!(gateway = %name, reference = %reference, "Payment not found on gateway");
            }
            Err(error) => {
                tracing::warn!(
                    gateway = %name,
                    reference = %reference,
                    error = %error,
                    "Payment lookup failed"
                );
                if options.stop_on_error {
                    return Err(error);
                }
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| PaymentError::not_found(reference)))
}
