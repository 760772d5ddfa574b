//! Integration tests for the Paystack adapter against an HTTP double.
//!
//! These tests verify:
//! 1. Request shape (auth header, minor-unit amounts, channels, metadata)
//! 2. Response mapping (status, channel, customer, authorization)
//! 3. Error classification (HTTP errors, unsuccessful envelopes, timeouts)

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use payment_gateways::adapters::common::GatewayConfig;
use payment_gateways::adapters::PaystackGateway;
use payment_gateways::domain::payment::{
    CancelPaymentRequest, Currency, Customer, GetPaymentRequest, InitiatePaymentRequest, Money,
    PaymentChannel, PaymentErrorKind, PaymentStatus, RefundPaymentRequest, RefundStatus,
    VerifyPaymentRequest,
};
use payment_gateways::ports::PaymentGateway;

// =============================================================================
// Test Infrastructure
// =============================================================================

const SECRET: &str = "sk_test_paystack";

fn gateway(server: &MockServer) -> PaystackGateway {
    PaystackGateway::new(GatewayConfig::new(SECRET, &server.uri())).unwrap()
}

fn transaction(reference: &str, status: &str) -> serde_json::Value {
    json!({
        "status": true,
        "message": "Verification successful",
        "data": {
            "id": 4099260516_i64,
            "status": status,
            "reference": reference,
            "amount": 500000,
            "currency": "NGN",
            "channel": "card",
            "gateway_response": "Approved",
            "paid_at": "2024-08-22T09:15:02.000Z",
            "created_at": "2024-08-22T09:14:24.000Z",
            "metadata": {"order_id": "ord_1"},
            "customer": {
                "email": "ada@example.com",
                "first_name": "Ada",
                "last_name": "Obi",
                "phone": null
            },
            "authorization": {
                "authorization_code": "AUTH_8dfhjjdt",
                "bin": "408408",
                "last4": "4081",
                "exp_month": "12",
                "exp_year": "2030",
                "card_type": "visa ",
                "bank": "TEST BANK",
                "country_code": "NG",
                "brand": "visa",
                "reusable": true
            }
        }
    })
}

// =============================================================================
// Initiate
// =============================================================================

#[tokio::test]
async fn initiate_sends_minor_units_and_returns_checkout_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .and(header("authorization", format!("Bearer {SECRET}").as_str()))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "amount": 5000,
            "currency": "NGN",
            "reference": "PSK_ORDER_1",
            "channels": ["card", "bank_transfer"],
            "metadata": {"customer_name": "Ada Obi"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.paystack.com/0peioxfhpn",
                "access_code": "0peioxfhpn",
                "reference": "PSK_ORDER_1"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let amount = Money::new(dec!(50.00), Currency::NGN);
    let request = InitiatePaymentRequest::new(
        amount,
        Customer::new("ada@example.com").with_name("Ada", "Obi"),
    )
    .with_reference("PSK_ORDER_1")
    .with_channels(vec![PaymentChannel::Card, PaymentChannel::BankTransfer]);

    let response = gateway(&server).initiate_payment(request).await.unwrap();

    assert_eq!(response.reference, "PSK_ORDER_1");
    assert_eq!(response.status, PaymentStatus::Pending);
    assert_eq!(response.amount, amount);
    assert_eq!(
        response.authorization_url.as_deref(),
        Some("https://checkout.paystack.com/0peioxfhpn")
    );
    assert_eq!(response.access_code.as_deref(), Some("0peioxfhpn"));
    assert!(response.client_secret.is_none());
}

#[tokio::test]
async fn initiate_below_minimum_never_calls_paystack() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = InitiatePaymentRequest::new(
        Money::new(dec!(49.99), Currency::NGN),
        Customer::new("ada@example.com"),
    );

    let err = gateway(&server).initiate_payment(request).await.unwrap_err();
    assert_eq!(err.kind, PaymentErrorKind::Validation);
    assert!(err.message.contains("50.00 NGN"));
}

#[tokio::test]
async fn oversized_amounts_are_rejected_without_calling_paystack() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let huge = Money::new(Decimal::MAX, Currency::NGN);
    let gateway = gateway(&server);

    let err = gateway
        .initiate_payment(InitiatePaymentRequest::new(huge, Customer::new("ada@example.com")))
        .await
        .unwrap_err();
    assert_eq!(err.kind, PaymentErrorKind::Validation);

    let err = gateway
        .refund_payment(RefundPaymentRequest::partial("PSK_ORDER_1", huge))
        .await
        .unwrap_err();
    assert_eq!(err.kind, PaymentErrorKind::Validation);
}

#[tokio::test]
async fn sub_unit_refund_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/refund"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .refund_payment(RefundPaymentRequest::partial(
            "PSK_ORDER_1",
            Money::new(dec!(0.001), Currency::NGN),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind, PaymentErrorKind::Validation);
}

#[tokio::test]
async fn initiate_unsupported_currency() {
    let server = MockServer::start().await;
    let request = InitiatePaymentRequest::new(
        Money::new(dec!(10), Currency::EUR),
        Customer::new("ada@example.com"),
    );

    let err = gateway(&server).initiate_payment(request).await.unwrap_err();
    assert_eq!(err.kind, PaymentErrorKind::UnsupportedCurrency);
}

// =============================================================================
// Verify / Get
// =============================================================================

#[tokio::test]
async fn verify_maps_transaction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/PSK_ORDER_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(transaction("PSK_ORDER_1", "success")),
        )
        .mount(&server)
        .await;

    let response = gateway(&server)
        .verify_payment(VerifyPaymentRequest::new("PSK_ORDER_1"))
        .await
        .unwrap();

    assert_eq!(response.status, PaymentStatus::Success);
    assert_eq!(response.amount, Money::new(dec!(5000.00), Currency::NGN));
    assert_eq!(response.channel, Some(PaymentChannel::Card));
    assert_eq!(response.gateway_transaction_id.as_deref(), Some("4099260516"));
    assert_eq!(response.gateway_response.as_deref(), Some("Approved"));
    assert!(response.paid_at.is_some());
    assert_eq!(response.customer.unwrap().email, "ada@example.com");
    assert!(response.raw.is_some());
}

#[tokio::test]
async fn get_includes_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/PSK_ORDER_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(transaction("PSK_ORDER_1", "success")),
        )
        .mount(&server)
        .await;

    let response = gateway(&server)
        .get_payment(GetPaymentRequest::new("PSK_ORDER_1"))
        .await
        .unwrap();

    let authorization = response.authorization.unwrap();
    assert_eq!(authorization.last4.as_deref(), Some("4081"));
    assert_eq!(authorization.card_type.as_deref(), Some("visa"));
    assert_eq!(authorization.issuer.as_deref(), Some("TEST BANK"));
    assert_eq!(authorization.reusable, Some(true));
    assert!(response.created_at.is_some());
    assert_eq!(response.metadata.unwrap()["order_id"], "ord_1");
}

#[tokio::test]
async fn reference_with_query_string_never_reaches_paystack() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/OTHER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transaction("OTHER", "success")))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .verify_payment(VerifyPaymentRequest::new("OTHER?ref=MINE"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, PaymentErrorKind::Validation);
}

#[tokio::test]
async fn transaction_for_another_reference_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/PSK_ORDER_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transaction("OTHER", "success")))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .verify_payment(VerifyPaymentRequest::new("PSK_ORDER_1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, PaymentErrorKind::InvalidResponse);
    assert_eq!(err.gateway.as_deref(), Some("paystack"));
}

#[tokio::test]
async fn verify_unsuccessful_envelope_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/PSK_ORDER_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "Invalid key"
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .verify_payment(VerifyPaymentRequest::new("PSK_ORDER_1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, PaymentErrorKind::InvalidResponse);
    assert_eq!(err.message, "Invalid key");
}

#[tokio::test]
async fn verify_http_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/PSK_MISSING"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": false,
            "message": "Transaction reference not found"
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .verify_payment(VerifyPaymentRequest::new("PSK_MISSING"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, PaymentErrorKind::GatewayError);
    assert_eq!(err.message, "Transaction reference not found");
    assert_eq!(err.status_code(), Some(400));
    assert!(err.is_not_found());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .verify_payment(VerifyPaymentRequest::new("PSK_ORDER_1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, PaymentErrorKind::GatewayError);
    assert_eq!(err.status_code(), Some(503));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(transaction("PSK_ORDER_1", "success"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = GatewayConfig::new(SECRET, &server.uri()).with_timeout(Duration::from_millis(200));
    let gateway = PaystackGateway::new(config).unwrap();

    let err = gateway
        .verify_payment(VerifyPaymentRequest::new("PSK_ORDER_1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, PaymentErrorKind::GatewayTimeout);
    assert_eq!(err.gateway.as_deref(), Some("paystack"));
    assert!(err.is_retryable());
}

// =============================================================================
// Refund / Cancel
// =============================================================================

#[tokio::test]
async fn partial_refund_sends_minor_units() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/refund"))
        .and(body_json(json!({
            "transaction": "PSK_ORDER_1",
            "amount": 250000,
            "merchant_note": "Damaged item"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Refund has been queued for processing",
            "data": {
                "id": 1234567,
                "status": "pending",
                "amount": 250000,
                "currency": "NGN"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request =
        RefundPaymentRequest::partial("PSK_ORDER_1", Money::new(dec!(2500), Currency::NGN))
            .with_reason("Damaged item");

    let response = gateway(&server).refund_payment(request).await.unwrap();

    assert_eq!(response.reference, "PSK_ORDER_1");
    assert_eq!(response.refund_reference, "1234567");
    assert_eq!(response.refunded_amount, Money::new(dec!(2500), Currency::NGN));
    assert_eq!(response.status, RefundStatus::Pending);
}

#[tokio::test]
async fn cancel_reports_current_status_without_cancelling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/PSK_ORDER_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(transaction("PSK_ORDER_1", "abandoned")),
        )
        .mount(&server)
        .await;

    let response = gateway(&server)
        .cancel_payment(CancelPaymentRequest::new("PSK_ORDER_1"))
        .await
        .unwrap();

    assert_eq!(response.status, PaymentStatus::Abandoned);
    assert!(!response.cancelled);
}
