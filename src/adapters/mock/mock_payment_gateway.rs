//! Mock payment gateway for testing.
//!
//! Provides a configurable in-memory implementation of `PaymentGateway` for
//! manager, lookup and caller tests. Supports:
//! - Stored payments keyed by reference
//! - Error injection, globally or per method
//! - Call tracking
//! - A readiness toggle

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::adapters::common::amounts::check_refund_amount;
use crate::domain::payment::{
    generate_reference, CancelPaymentRequest, CancelPaymentResponse, GetPaymentRequest,
    GetPaymentResponse, InitiatePaymentRequest, InitiatePaymentResponse, PaymentError,
    PaymentResult, PaymentStatus, RefundPaymentRequest, RefundPaymentResponse, RefundStatus,
    VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::ports::PaymentGateway;

/// Mock gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new("paystack");
///
/// // Seed a payment
/// mock.add_payment(verified_payment("PSK_1_abcd1234"));
///
/// // Inject errors
/// mock.set_method_error("verify_payment", PaymentError::timeout("slow"));
///
/// // Use behind the manager
/// manager.register_gateway("paystack", Arc::new(mock.clone()));
/// ```
#[derive(Clone)]
pub struct MockPaymentGateway {
    name: String,

    /// Shared with clones so tests can inspect a registered instance.
    inner: Arc<Mutex<MockState>>,
}

struct MockState {
    ready: bool,

    /// Payments by reference.
    payments: HashMap<String, VerifyPaymentResponse>,

    /// Error to return on the next call to any method.
    next_error: Option<PaymentError>,

    /// Errors returned by one method until cleared.
    method_errors: HashMap<String, PaymentError>,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub reference: Option<String>,
}

impl MockPaymentGateway {
    /// A ready mock registered under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(MockState {
                ready: true,
                payments: HashMap::new(),
                next_error: None,
                method_errors: HashMap::new(),
                call_log: Vec::new(),
            })),
        }
    }

    /// A mock whose `is_ready()` is false, as if its credential were missing.
    pub fn not_ready(name: impl Into<String>) -> Self {
        let mock = Self::new(name);
        mock.set_ready(false);
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn set_ready(&self, ready: bool) {
        self.state().ready = ready;
    }

    /// Store a payment so verify/get/refund/cancel can find it.
    pub fn add_payment(&self, payment: VerifyPaymentResponse) {
        self.state()
            .payments
            .insert(payment.reference.clone(), payment);
    }

    /// Current stored state of a payment.
    pub fn payment(&self, reference: &str) -> Option<VerifyPaymentResponse> {
        self.state().payments.get(reference).cloned()
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call, then surface any injected error.
    fn enter(&self, method: &str, reference: Option<&str>) -> PaymentResult<()> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            reference: reference.map(str::to_string),
        });

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone().with_gateway(self.name.clone()));
        }
        if let Some(error) = state.next_error.take() {
            return Err(error.with_gateway(self.name.clone()));
        }
        Ok(())
    }

    fn stored(&self, reference: &str) -> PaymentResult<VerifyPaymentResponse> {
        self.payment(reference)
            .ok_or_else(|| PaymentError::not_found(reference).with_gateway(self.name.clone()))
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> PaymentResult<InitiatePaymentResponse> {
        self.enter("initiate_payment", request.reference.as_deref())?;
        request.validate()?;

        let reference = request
            .reference
            .clone()
            .unwrap_or_else(|| generate_reference("MCK"));

        self.add_payment(VerifyPaymentResponse {
            reference: reference.clone(),
            status: PaymentStatus::Pending,
            amount: request.amount,
            channel: None,
            paid_at: None,
            customer: Some(request.customer.clone()),
            gateway_transaction_id: Some(format!("mock_{}", reference)),
            gateway_response: None,
            raw: None,
        });

        Ok(InitiatePaymentResponse {
            authorization_url: Some(format!("https://checkout.mock.test/{}", reference)),
            reference,
            status: PaymentStatus::Pending,
            amount: request.amount,
            access_code: None,
            client_secret: None,
            gateway_transaction_id: None,
            raw: None,
        })
    }

    async fn verify_payment(
        &self,
        request: VerifyPaymentRequest,
    ) -> PaymentResult<VerifyPaymentResponse> {
        self.enter("verify_payment", Some(&request.reference))?;
        self.stored(&request.reference)
    }

    async fn get_payment(&self, request: GetPaymentRequest) -> PaymentResult<GetPaymentResponse> {
        self.enter("get_payment", Some(&request.reference))?;
        Ok(GetPaymentResponse {
            verification: self.stored(&request.reference)?,
            authorization: None,
            created_at: None,
            metadata: None,
        })
    }

    async fn refund_payment(
        &self,
        request: RefundPaymentRequest,
    ) -> PaymentResult<RefundPaymentResponse> {
        self.enter("refund_payment", Some(&request.reference))?;
        request.validate()?;

        let mut payment = self.stored(&request.reference)?;
        let refunded_amount = match request.amount {
            Some(amount) => {
                check_refund_amount(&amount, &payment.amount)?;
                amount
            }
            None => payment.amount,
        };

        if refunded_amount == payment.amount {
            payment.status = PaymentStatus::Reversed;
            self.add_payment(payment);
        }

        Ok(RefundPaymentResponse {
            refund_reference: format!("rfnd_{}", request.reference),
            reference: request.reference,
            refunded_amount,
            status: RefundStatus::Processed,
            raw: None,
        })
    }

    async fn cancel_payment(
        &self,
        request: CancelPaymentRequest,
    ) -> PaymentResult<CancelPaymentResponse> {
        self.enter("cancel_payment", Some(&request.reference))?;

        let mut payment = self.stored(&request.reference)?;
        let cancelled = payment.status == PaymentStatus::Pending;
        if cancelled {
            payment.status = PaymentStatus::Abandoned;
            self.add_payment(payment.clone());
        }

        Ok(CancelPaymentResponse {
            reference: request.reference,
            status: payment.status,
            cancelled,
            raw: None,
        })
    }

    fn gateway_name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.state().ready
    }
}
