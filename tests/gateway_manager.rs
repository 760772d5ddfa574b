//! Integration tests for gateway selection through the manager.
//!
//! These tests verify the manager wiring end to end:
//! 1. Built-in factories register real adapters from registrations
//! 2. A gateway without credentials never becomes selectable
//! 3. Fallback order and cross-gateway lookup over several gateways

use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use payment_gateways::adapters::{
    flutterwave_factory, paystack_factory, stripe_factory, MockPaymentGateway,
};
use payment_gateways::application::{verify_across_gateways, GatewayManager, LookupOptions};
use payment_gateways::domain::payment::{
    Currency, Customer, InitiatePaymentRequest, Money, PaymentError, PaymentErrorKind,
    PaymentStatus, VerifyPaymentResponse,
};
use payment_gateways::ports::{GatewayRegistration, PaymentGateway};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn payment(reference: &str, amount: Money) -> VerifyPaymentResponse {
    VerifyPaymentResponse {
        reference: reference.to_string(),
        status: PaymentStatus::Success,
        amount,
        channel: None,
        paid_at: None,
        customer: None,
        gateway_transaction_id: None,
        gateway_response: None,
        raw: None,
    }
}

fn selected(manager: &GatewayManager, preferred: Option<&str>) -> Option<String> {
    manager
        .get_gateway_with_fallback(preferred)
        .unwrap()
        .map(|gateway| gateway.gateway_name().to_string())
}

// =============================================================================
// Construction Scenarios
// =============================================================================

#[test]
fn gateway_without_credentials_is_never_selectable() {
    let mut manager = GatewayManager::new();
    manager.add_registration(
        GatewayRegistration::new("stripe", json!({"secret_key": ""})).with_priority(100),
    );
    manager.add_registration(
        GatewayRegistration::new("paystack", json!({"secret_key": "sk_test_paystack"}))
            .with_priority(90),
    );

    // The keyless gateway's factory runs first and fails.
    manager.register_factory("stripe", stripe_factory());
    manager.register_factory("paystack", paystack_factory());

    let err = manager.get_gateway("stripe").err().unwrap();
    assert_eq!(err.kind, PaymentErrorKind::Configuration);
    assert!(err.is_fatal());

    assert_eq!(manager.get_available_gateways(), vec!["paystack"]);
    assert_eq!(
        manager.get_default_gateway().unwrap().gateway_name(),
        "paystack"
    );
    assert_eq!(selected(&manager, Some("stripe")).as_deref(), Some("paystack"));
}

#[test]
fn not_ready_gateway_is_rejected_by_name() {
    let mut manager = GatewayManager::new();
    manager.register_gateway("x", Arc::new(MockPaymentGateway::not_ready("x")));
    manager.register_gateway("y", Arc::new(MockPaymentGateway::new("y")));

    let err = manager.get_gateway("x").err().unwrap();
    assert_eq!(err.kind, PaymentErrorKind::Configuration);
    assert_eq!(manager.get_ready_gateways(), vec!["y"]);
    assert_eq!(selected(&manager, Some("x")).as_deref(), Some("y"));
}

#[test]
fn builtin_gateways_fall_back_by_priority() {
    let mut manager = GatewayManager::new();
    manager.register_factory("paystack", paystack_factory());
    manager.register_factory("flutterwave", flutterwave_factory());
    manager.register_factory("stripe", stripe_factory());

    manager.add_registration(
        GatewayRegistration::new("stripe", json!({"secret_key": "sk_test_stripe"}))
            .with_priority(80),
    );
    manager.add_registration(
        GatewayRegistration::new("flutterwave", json!({"secret_key": "FLWSECK_TEST-abc"}))
            .with_priority(90),
    );
    manager.add_registration(
        GatewayRegistration::new("paystack", json!({"secret_key": "sk_test_paystack"}))
            .with_priority(100),
    );

    assert_eq!(
        manager.get_available_gateways(),
        vec!["stripe", "flutterwave", "paystack"]
    );
    assert_eq!(selected(&manager, None).as_deref(), Some("paystack"));
    assert_eq!(selected(&manager, Some("unknown")).as_deref(), Some("paystack"));

    manager.remove_gateway("paystack");
    assert_eq!(selected(&manager, None).as_deref(), Some("flutterwave"));

    manager.remove_gateway("flutterwave");
    manager.remove_gateway("stripe");
    assert_eq!(selected(&manager, None), None);
}

// =============================================================================
// End-to-end Scenarios
// =============================================================================

#[tokio::test]
async fn initiate_through_manager_sends_wire_amount() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .and(body_partial_json(json!({"amount": 5000, "currency": "NGN"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.paystack.com/abc",
                "access_code": "abc",
                "reference": "PSK_ORDER_50"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = GatewayManager::new();
    manager.add_registration(GatewayRegistration::new(
        "paystack",
        json!({"secret_key": "sk_test_paystack", "base_url": server.uri()}),
    ));
    manager.register_factory("paystack", paystack_factory());

    let gateway = manager.get_gateway_with_fallback(None).unwrap().unwrap();
    let amount = Money::new(dec!(50.00), Currency::NGN);
    let response = gateway
        .initiate_payment(
            InitiatePaymentRequest::new(amount, Customer::new("ada@example.com"))
                .with_reference("PSK_ORDER_50"),
        )
        .await
        .unwrap();

    assert_eq!(response.amount, amount);
    assert_eq!(response.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn lookup_scans_gateways_until_found() {
    let paystack = MockPaymentGateway::new("paystack");
    let flutterwave = MockPaymentGateway::new("flutterwave");
    let stripe = MockPaymentGateway::new("stripe");
    paystack.set_method_error(
        "verify_payment",
        PaymentError::gateway_error("Transaction reference not found", 400, json!({})),
    );
    flutterwave.set_method_error("verify_payment", PaymentError::timeout("slow"));
    stripe.add_payment(payment("REF_42", Money::new(dec!(20), Currency::USD)));

    let mut manager = GatewayManager::new();
    for (mock, priority) in [(&paystack, 100), (&flutterwave, 90), (&stripe, 80)] {
        let name = mock.gateway_name().to_string();
        manager.add_registration(
            GatewayRegistration::new(name.clone(), json!({})).with_priority(priority),
        );
        manager.register_gateway(name, Arc::new(mock.clone()));
    }

    let found = verify_across_gateways(&manager, "REF_42", LookupOptions::default())
        .await
        .unwrap();

    assert_eq!(found.gateway, "stripe");
    assert_eq!(found.response.amount, Money::new(dec!(20), Currency::USD));
    assert_eq!(paystack.call_count("verify_payment"), 1);
    assert_eq!(flutterwave.call_count("verify_payment"), 1);

    let err = verify_across_gateways(&manager, "REF_42", LookupOptions::stop_on_error())
        .await
        .unwrap_err();
    assert_eq!(err.kind, PaymentErrorKind::GatewayTimeout);
    assert_eq!(stripe.call_count("verify_payment"), 1);
}
