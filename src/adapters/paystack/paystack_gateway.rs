//! Paystack gateway adapter.
//!
//! Paystack is reference-keyed: every lookup and refund takes the caller's
//! reference directly, and amounts travel in minor units (kobo for NGN).
//! Paystack has no cancel endpoint; `cancel_payment` reports the current
//! status with `cancelled = false`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::adapters::common::amounts::{
    from_wire_amount, to_wire_amount, to_wire_amount_unchecked, wire_to_i64,
};
use crate::adapters::common::error_classifier::top_level_message;
use crate::adapters::common::status_map::{
    channel_from_wire, channels_to_wire, map_refund_status, map_status,
};
use crate::adapters::common::{
    decode, parse_currency, parse_timestamp, AuthScheme, ChannelTable, CurrencyRule,
    GatewayConfig, GatewayHttpClient, StatusTable,
};
use crate::domain::payment::{
    generate_reference, validate_reference, CancelPaymentRequest, CancelPaymentResponse, Currency,
    Customer, GetPaymentRequest, GetPaymentResponse, InitiatePaymentRequest,
    InitiatePaymentResponse, PaymentAuthorization, PaymentChannel, PaymentError, PaymentResult,
    PaymentStatus, RefundPaymentRequest, RefundPaymentResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
use crate::ports::{GatewayRegistration, PaymentGateway};

use super::types::{
    PaystackAuthorization, PaystackEnvelopeHead, PaystackInitializeData, PaystackRefund,
    PaystackTransaction,
};

/// Registry name.
pub const PAYSTACK: &str = "paystack";

pub const PAYSTACK_BASE_URL: &str = "https://api.paystack.co";

const REFERENCE_PREFIX: &str = "PSK";

/// Supported currencies; minimums are in minor units.
pub const PAYSTACK_CURRENCIES: &[CurrencyRule] = &[
    CurrencyRule::minor(Currency::NGN, 100, 5000),
    CurrencyRule::minor(Currency::GHS, 100, 10),
    CurrencyRule::minor(Currency::ZAR, 100, 100),
    CurrencyRule::minor(Currency::KES, 100, 300),
    CurrencyRule::minor(Currency::USD, 100, 200),
];

const STATUSES: StatusTable = &[
    ("success", PaymentStatus::Success),
    ("abandoned", PaymentStatus::Abandoned),
    ("reversed", PaymentStatus::Reversed),
    ("pending", PaymentStatus::Pending),
    ("ongoing", PaymentStatus::Pending),
    ("processing", PaymentStatus::Pending),
    ("queued", PaymentStatus::Pending),
];

const CHANNELS: ChannelTable = &[
    (PaymentChannel::Card, "card"),
    (PaymentChannel::Bank, "bank"),
    (PaymentChannel::BankTransfer, "bank_transfer"),
    (PaymentChannel::Ussd, "ussd"),
    (PaymentChannel::Qr, "qr"),
    (PaymentChannel::MobileMoney, "mobile_money"),
    (PaymentChannel::Eft, "eft"),
    (PaymentChannel::ApplePay, "apple_pay"),
    (PaymentChannel::Payattitude, "payattitude"),
];

/// Map a raw Paystack transaction status.
pub fn map_paystack_status(raw: &str) -> PaymentStatus {
    map_status(PAYSTACK, STATUSES, raw)
}

/// Paystack adapter.
pub struct PaystackGateway {
    http: GatewayHttpClient,
}

impl PaystackGateway {
    /// Fails with a configuration error when the secret key is missing.
    pub fn new(config: GatewayConfig) -> PaymentResult<Self> {
        if !config.has_secret() {
            return Err(
                PaymentError::configuration("Paystack secret key is required").with_gateway(PAYSTACK),
            );
        }

        let http = GatewayHttpClient::new(PAYSTACK, config, AuthScheme::Bearer, top_level_message)?;
        Ok(Self { http })
    }

    pub fn from_registration(registration: &GatewayRegistration) -> PaymentResult<Self> {
        Self::new(GatewayConfig::from_registration(
            &registration.config,
            PAYSTACK_BASE_URL,
        )?)
    }

    fn initialize_body(
        &self,
        request: &InitiatePaymentRequest,
        reference: &str,
        wire_amount: i64,
    ) -> Value {
        let mut body = json!({
            "email": request.customer.email,
            "amount": wire_amount,
            "currency": request.amount.currency.code(),
            "reference": reference,
        });

        if let Some(callback_url) = &request.callback_url {
            body["callback_url"] = json!(callback_url);
        }

        if let Some(channels) = &request.channels {
            let wire = channels_to_wire(PAYSTACK, CHANNELS, channels);
            if !wire.is_empty() {
                body["channels"] = json!(wire);
            }
        }

        let mut metadata = match &request.metadata {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        if let Some(description) = &request.description {
            metadata.insert("description".to_string(), json!(description));
        }
        if let Some(name) = request.customer.full_name() {
            metadata.insert("customer_name".to_string(), json!(name));
        }
        if !metadata.is_empty() {
            body["metadata"] = Value::Object(metadata);
        }

        body
    }

    async fn fetch_transaction(&self, path: &str) -> PaymentResult<(PaystackTransaction, Value)> {
        let body = self.http.get(path, &[]).await?;
        let transaction = unwrap_envelope(&body)?;
        Ok((transaction, body))
    }

    fn to_verification(
        &self,
        requested: &str,
        transaction: &PaystackTransaction,
        raw: Value,
    ) -> PaymentResult<VerifyPaymentResponse> {
        if transaction.reference != requested {
            return Err(PaymentError::invalid_response(format!(
                "Paystack returned transaction '{}' for reference '{}'",
                transaction.reference, requested
            ))
            .with_gateway(PAYSTACK)
            .with_details(json!({
                "requested": requested,
                "returned": transaction.reference,
            })));
        }

        let currency = parse_currency(PAYSTACK, &transaction.currency)?;
        let amount = from_wire_amount(PAYSTACK_CURRENCIES, currency, transaction.amount)?;

        Ok(VerifyPaymentResponse {
            reference: transaction.reference.clone(),
            status: map_paystack_status(&transaction.status),
            amount,
            channel: transaction
                .channel
                .as_deref()
                .and_then(|c| channel_from_wire(CHANNELS, c)),
            paid_at: parse_timestamp(transaction.paid_at.as_deref()),
            customer: transaction.customer.as_ref().map(|c| Customer {
                email: c.email.clone(),
                first_name: c.first_name.clone(),
                last_name: c.last_name.clone(),
                phone: c.phone.clone(),
                metadata: None,
            }),
            gateway_transaction_id: Some(transaction.id.to_string()),
            gateway_response: transaction.gateway_response.clone(),
            raw: Some(raw),
        })
    }
}

/// Check the envelope and decode `data`.
fn unwrap_envelope<T: DeserializeOwned>(body: &Value) -> PaymentResult<T> {
    let head: PaystackEnvelopeHead = decode(PAYSTACK, body)?;
    if !head.status {
        return Err(PaymentError::invalid_response(if head.message.is_empty() {
            "Paystack reported an unsuccessful response".to_string()
        } else {
            head.message
        })
        .with_gateway(PAYSTACK)
        .with_details(json!({ "response": body })));
    }

    match body.get("data") {
        Some(data) if !data.is_null() => decode(PAYSTACK, data),
        _ => Err(PaymentError::invalid_response("Paystack response has no data")
            .with_gateway(PAYSTACK)),
    }
}

fn to_authorization(authorization: &PaystackAuthorization) -> Option<PaymentAuthorization> {
    let mapped = PaymentAuthorization {
        authorization_code: authorization.authorization_code.clone(),
        bin: authorization.bin.clone(),
        last4: authorization.last4.clone(),
        exp_month: authorization.exp_month.clone(),
        exp_year: authorization.exp_year.clone(),
        card_type: authorization.card_type.as_ref().map(|t| t.trim().to_string()),
        brand: authorization.brand.clone(),
        issuer: authorization.bank.clone(),
        country_code: authorization.country_code.clone(),
        reusable: authorization.reusable,
    };
    (!mapped.is_empty()).then_some(mapped)
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> PaymentResult<InitiatePaymentResponse> {
        request.validate()?;
        let reference = request
            .reference
            .clone()
            .unwrap_or_else(|| generate_reference(REFERENCE_PREFIX));

        let wire_amount = wire_to_i64(to_wire_amount(PAYSTACK_CURRENCIES, &request.amount)?)?;

        tracing::info!(
            gateway = PAYSTACK,
            reference = %reference,
            amount = %request.amount,
            wire_amount,
            "Initiating payment"
        );

        let body = self.initialize_body(&request, &reference, wire_amount);
        let raw = self.http.post_json("/transaction/initialize", &body).await?;
        let data: PaystackInitializeData = unwrap_envelope(&raw)?;

        tracing::info!(gateway = PAYSTACK, reference = %data.reference, "Payment initiated");

        Ok(InitiatePaymentResponse {
            reference: data.reference,
            status: PaymentStatus::Pending,
            amount: request.amount,
            authorization_url: Some(data.authorization_url),
            access_code: Some(data.access_code),
            client_secret: None,
            gateway_transaction_id: None,
            raw: Some(raw),
        })
    }

    async fn verify_payment(
        &self,
        request: VerifyPaymentRequest,
    ) -> PaymentResult<VerifyPaymentResponse> {
        validate_reference(&request.reference)?;
        tracing::info!(gateway = PAYSTACK, reference = %request.reference, "Verifying payment");

        let (transaction, raw) = self
            .fetch_transaction(&format!("/transaction/verify/{}", request.reference))
            .await?;
        let verification = self.to_verification(&request.reference, &transaction, raw)?;

        tracing::info!(
            gateway = PAYSTACK,
            reference = %verification.reference,
            status = %verification.status,
            "Payment verified"
        );
        Ok(verification)
    }

    async fn get_payment(&self, request: GetPaymentRequest) -> PaymentResult<GetPaymentResponse> {
        validate_reference(&request.reference)?;
        tracing::info!(gateway = PAYSTACK, reference = %request.reference, "Fetching payment");

        let (transaction, raw) = self
            .fetch_transaction(&format!("/transaction/{}", request.reference))
            .await?;

        let authorization = transaction.authorization.as_ref().and_then(to_authorization);
        let created_at = parse_timestamp(transaction.created_at.as_deref());
        let metadata = transaction
            .metadata
            .clone()
            .filter(|m| m.is_object() || m.is_array());

        Ok(GetPaymentResponse {
            verification: self.to_verification(&request.reference, &transaction, raw)?,
            authorization,
            created_at,
            metadata,
        })
    }

    async fn refund_payment(
        &self,
        request: RefundPaymentRequest,
    ) -> PaymentResult<RefundPaymentResponse> {
        request.validate()?;

        let mut body = json!({ "transaction": request.reference });
        if let Some(amount) = &request.amount {
            let wire = wire_to_i64(to_wire_amount_unchecked(PAYSTACK_CURRENCIES, amount)?)?;
            body["amount"] = json!(wire);
        }
        if let Some(reason) = &request.reason {
            body["merchant_note"] = json!(reason);
        }

        tracing::info!(
            gateway = PAYSTACK,
            reference = %request.reference,
            partial = request.amount.is_some(),
            "Refunding payment"
        );

        let raw = self.http.post_json("/refund", &body).await?;
        let refund: PaystackRefund = unwrap_envelope(&raw)?;

        let currency = parse_currency(PAYSTACK, &refund.currency)?;
        let refunded_amount = from_wire_amount(PAYSTACK_CURRENCIES, currency, refund.amount)?;

        Ok(RefundPaymentResponse {
            reference: request.reference,
            refund_reference: refund.id.to_string(),
            refunded_amount,
            status: map_refund_status(&refund.status),
            raw: Some(raw),
        })
    }

    async fn cancel_payment(
        &self,
        request: CancelPaymentRequest,
    ) -> PaymentResult<CancelPaymentResponse> {
        tracing::warn!(
            gateway = PAYSTACK,
            reference = %request.reference,
            "Paystack has no cancel endpoint; reporting current status"
        );

        let verification = self
            .verify_payment(VerifyPaymentRequest::new(request.reference.clone()))
            .await?;

        Ok(CancelPaymentResponse {
            reference: verification.reference,
            status: verification.status,
            cancelled: false,
            raw: verification.raw,
        })
    }

    fn gateway_name(&self) -> &str {
        PAYSTACK
    }

    fn is_ready(&self) -> bool {
        self.http.config().has_secret()
    }
}
