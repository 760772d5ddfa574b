//! Maps transport failures and gateway error payloads onto `PaymentError`.

use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::payment::PaymentError;

/// Pulls the human-readable error text out of a gateway error body.
pub type MessageExtractor = fn(&Value) -> Option<String>;

/// `{"message": "..."}`, used by Paystack and Flutterwave.
pub fn top_level_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{"error": {"message": "..."}}`, used by Stripe.
pub fn nested_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Classify a failure that happened before any HTTP status was received.
pub fn classify_transport_error(gateway: &str, err: &reqwest::Error) -> PaymentError {
    if err.is_timeout() {
        PaymentError::timeout(format!("{} request timed out", gateway))
    } else if err.is_connect() {
        PaymentError::unknown(format!("Connection to {} failed: {}", gateway, err))
    } else {
        PaymentError::unknown(format!("{} request failed: {}", gateway, err))
    }
    .with_gateway(gateway)
}

/// Build the error for a non-success HTTP status.
///
/// `body` is the raw response text; it is kept as JSON when it parses and as a
/// string otherwise.
pub fn http_status_error(
    gateway: &str,
    status: StatusCode,
    body: &str,
    extract_message: MessageExtractor,
) -> PaymentError {
    let response: Value =
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));

    let message = extract_message(&response).unwrap_or_else(|| {
        format!(
            "{} returned HTTP {}",
            gateway,
            status.canonical_reason().unwrap_or("error")
        )
    });

    PaymentError::gateway_error(message, status.as_u16(), response).with_gateway(gateway)
}
