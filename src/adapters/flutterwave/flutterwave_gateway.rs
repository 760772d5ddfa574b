//! Flutterwave gateway adapter.
//!
//! Hosted checkout via `POST /payments`, lookups by `tx_ref`. Refunds are keyed
//! by Flutterwave's numeric transaction id, so a refund first resolves the
//! reference through `get_payment`. There is no cancel endpoint.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::adapters::common::amounts::{
    check_refund_amount, from_wire_amount, to_wire_amount, to_wire_amount_unchecked,
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
    InitiatePaymentResponse, PaymentAuthorization, PaymentChannel, PaymentError,
    PaymentErrorKind, PaymentResult, PaymentStatus, RefundPaymentRequest, RefundPaymentResponse,
    VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::ports::{GatewayRegistration, PaymentGateway};

use super::types::{
    FlutterwaveCard, FlutterwaveCustomerBody, FlutterwaveCustomizations,
    FlutterwaveEnvelopeHead, FlutterwavePaymentBody, FlutterwavePaymentLink, FlutterwaveRefund,
    FlutterwaveRefundBody, FlutterwaveTransaction,
};

/// Registry name.
pub const FLUTTERWAVE: &str = "flutterwave";

pub const FLUTTERWAVE_BASE_URL: &str = "https://api.flutterwave.com/v3";

const REFERENCE_PREFIX: &str = "FLW";

/// Supported currencies; amounts and minimums are in major units.
pub const FLUTTERWAVE_CURRENCIES: &[CurrencyRule] = &[
    CurrencyRule::major(Currency::NGN, 2, 100),
    CurrencyRule::major(Currency::GHS, 2, 1),
    CurrencyRule::major(Currency::KES, 2, 10),
    CurrencyRule::major(Currency::ZAR, 2, 10),
    CurrencyRule::major(Currency::USD, 2, 1),
    CurrencyRule::major(Currency::EUR, 2, 1),
    CurrencyRule::major(Currency::GBP, 2, 1),
    CurrencyRule::major(Currency::UGX, 0, 500),
    CurrencyRule::major(Currency::TZS, 0, 100),
    CurrencyRule::major(Currency::RWF, 0, 100),
    CurrencyRule::major(Currency::XOF, 0, 100),
    CurrencyRule::major(Currency::XAF, 0, 100),
];

const STATUSES: StatusTable = &[
    ("successful", PaymentStatus::Success),
    ("success", PaymentStatus::Success),
    ("cancelled", PaymentStatus::Abandoned),
    ("reversed", PaymentStatus::Reversed),
    ("pending", PaymentStatus::Pending),
];

/// Outbound `payment_options`. Mobile money is resolved per currency.
const CHANNELS: ChannelTable = &[
    (PaymentChannel::Card, "card"),
    (PaymentChannel::Bank, "account"),
    (PaymentChannel::BankTransfer, "banktransfer"),
    (PaymentChannel::Ussd, "ussd"),
    (PaymentChannel::Qr, "qr"),
    (PaymentChannel::ApplePay, "applepay"),
];

/// Inbound `payment_type` values.
const PAYMENT_TYPES: ChannelTable = &[
    (PaymentChannel::Card, "card"),
    (PaymentChannel::Bank, "account"),
    (PaymentChannel::BankTransfer, "banktransfer"),
    (PaymentChannel::BankTransfer, "bank_transfer"),
    (PaymentChannel::Ussd, "ussd"),
    (PaymentChannel::Qr, "qr"),
    (PaymentChannel::ApplePay, "applepay"),
    (PaymentChannel::MobileMoney, "mobilemoneyghana"),
    (PaymentChannel::MobileMoney, "mpesa"),
    (PaymentChannel::MobileMoney, "mobilemoneyuganda"),
    (PaymentChannel::MobileMoney, "mobilemoneyrwanda"),
    (PaymentChannel::MobileMoney, "mobilemoneytanzania"),
    (PaymentChannel::MobileMoney, "mobilemoneyfranco"),
];

/// Map a raw Flutterwave transaction status.
pub fn map_flutterwave_status(raw: &str) -> PaymentStatus {
    map_status(FLUTTERWAVE, STATUSES, raw)
}

fn mobile_money_option(currency: Currency) -> Option<&'static str> {
    match currency {
        Currency::GHS => Some("mobilemoneyghana"),
        Currency::KES => Some("mpesa"),
        Currency::UGX => Some("mobilemoneyuganda"),
        Currency::RWF => Some("mobilemoneyrwanda"),
        Currency::TZS => Some("mobilemoneytanzania"),
        Currency::XOF | Currency::XAF => Some("mobilemoneyfranco"),
        _ => None,
    }
}

/// Build the comma-joined `payment_options` value.
fn payment_options(channels: &[PaymentChannel], currency: Currency) -> Option<String> {
    let (mobile, others): (Vec<PaymentChannel>, Vec<PaymentChannel>) = channels
        .iter()
        .copied()
        .partition(|channel| *channel == PaymentChannel::MobileMoney);

    let mut options = channels_to_wire(FLUTTERWAVE, CHANNELS, &others);
    if !mobile.is_empty() {
        match mobile_money_option(currency) {
            Some(option) if !options.contains(&option) => options.push(option),
            Some(_) => {}
            None => {
                tracing::debug!(
                    gateway = FLUTTERWAVE,
                    currency = %currency,
                    "No mobile money option for currency, dropping"
                );
            }
        }
    }

    (!options.is_empty()).then(|| options.join(","))
}

/// Flutterwave adapter.
pub struct FlutterwaveGateway {
    http: GatewayHttpClient,
}

impl FlutterwaveGateway {
    /// Fails with a configuration error when the secret key is missing.
    pub fn new(config: GatewayConfig) -> PaymentResult<Self> {
        if !config.has_secret() {
            return Err(PaymentError::configuration("Flutterwave secret key is required")
                .with_gateway(FLUTTERWAVE));
        }

        let http =
            GatewayHttpClient::new(FLUTTERWAVE, config, AuthScheme::Bearer, top_level_message)?;
        Ok(Self { http })
    }

    pub fn from_registration(registration: &GatewayRegistration) -> PaymentResult<Self> {
        Self::new(GatewayConfig::from_registration(
            &registration.config,
            FLUTTERWAVE_BASE_URL,
        )?)
    }

    fn payment_body(
        &self,
        request: &InitiatePaymentRequest,
        reference: &str,
        wire_amount: rust_decimal::Decimal,
    ) -> FlutterwavePaymentBody {
        let currency = request.amount.currency;

        FlutterwavePaymentBody {
            tx_ref: reference.to_string(),
            amount: wire_amount,
            currency: currency.code().to_string(),
            redirect_url: request.callback_url.clone(),
            payment_options: request
                .channels
                .as_deref()
                .and_then(|channels| payment_options(channels, currency)),
            customer: FlutterwaveCustomerBody {
                email: request.customer.email.clone(),
                phonenumber: request.customer.phone.clone(),
                name: request.customer.full_name(),
            },
            meta: request.metadata.clone(),
            customizations: request
                .description
                .clone()
                .map(|description| FlutterwaveCustomizations { description }),
        }
    }

    async fn fetch_transaction(
        &self,
        reference: &str,
    ) -> PaymentResult<(FlutterwaveTransaction, Value)> {
        validate_reference(reference)?;

        let raw = self
            .http
            .get("/transactions/verify_by_reference", &[("tx_ref", reference)])
            .await
            .map_err(|e| not_found_or(e, reference))?;
        let transaction = unwrap_envelope(&raw)?;
        Ok((transaction, raw))
    }

    fn to_verification(
        &self,
        transaction: &FlutterwaveTransaction,
        raw: Value,
    ) -> PaymentResult<VerifyPaymentResponse> {
        let currency = parse_currency(FLUTTERWAVE, &transaction.currency)?;
        let amount = from_wire_amount(FLUTTERWAVE_CURRENCIES, currency, transaction.amount)?;
        let status = map_flutterwave_status(&transaction.status);

        Ok(VerifyPaymentResponse {
            reference: transaction.tx_ref.clone(),
            status,
            amount,
            channel: transaction
                .payment_type
                .as_deref()
                .and_then(|t| channel_from_wire(PAYMENT_TYPES, t)),
            paid_at: if status == PaymentStatus::Success {
                parse_timestamp(transaction.created_at.as_deref())
            } else {
                None
            },
            customer: transaction.customer.as_ref().map(|c| {
                let (first_name, last_name) = split_name(c.name.as_deref());
                Customer {
                    email: c.email.clone(),
                    first_name,
                    last_name,
                    phone: c.phone_number.clone(),
                    metadata: None,
                }
            }),
            gateway_transaction_id: Some(transaction.id.to_string()),
            gateway_response: transaction.processor_response.clone(),
            raw: Some(raw),
        })
    }
}

/// Check the envelope and decode `data`.
fn unwrap_envelope<T: DeserializeOwned>(body: &Value) -> PaymentResult<T> {
    let head: FlutterwaveEnvelopeHead = decode(FLUTTERWAVE, body)?;
    if !head.is_success() {
        return Err(PaymentError::invalid_response(if head.message.is_empty() {
            "Flutterwave reported an unsuccessful response".to_string()
        } else {
            head.message
        })
        .with_gateway(FLUTTERWAVE)
        .with_details(json!({ "response": body })));
    }

    match body.get("data") {
        Some(data) if !data.is_null() => decode(FLUTTERWAVE, data),
        _ => Err(PaymentError::invalid_response("Flutterwave response has no data")
            .with_gateway(FLUTTERWAVE)),
    }
}

/// Flutterwave answers unknown references with HTTP 400 "No transaction was found".
fn not_found_or(err: PaymentError, reference: &str) -> PaymentError {
    let unknown_reference = err.kind == PaymentErrorKind::GatewayError
        && matches!(err.status_code(), Some(400) | Some(404))
        && err.message.to_lowercase().contains("no transaction");

    if unknown_reference {
        PaymentError::not_found(reference).with_gateway(FLUTTERWAVE)
    } else {
        err
    }
}

fn split_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => match name.split_once(' ') {
            Some((first, last)) => (Some(first.to_string()), Some(last.trim().to_string())),
            None => (Some(name.to_string()), None),
        },
        None => (None, None),
    }
}

fn to_authorization(card: &FlutterwaveCard) -> Option<PaymentAuthorization> {
    let (exp_month, exp_year) = match card.expiry.as_deref().and_then(|e| e.split_once('/')) {
        Some((month, year)) => (Some(month.to_string()), Some(year.to_string())),
        None => (None, None),
    };

    let mapped = PaymentAuthorization {
        authorization_code: card.token.clone(),
        bin: card.first_6digits.clone(),
        last4: card.last_4digits.clone(),
        exp_month,
        exp_year,
        card_type: card.card_type.clone(),
        brand: card.card_type.as_ref().map(|t| t.to_lowercase()),
        issuer: card.issuer.clone(),
        country_code: card.country.clone(),
        reusable: card.token.as_ref().map(|_| true),
    };
    (!mapped.is_empty()).then_some(mapped)
}

#[async_trait]
impl PaymentGateway for FlutterwaveGateway {
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> PaymentResult<InitiatePaymentResponse> {
        request.validate()?;
        let reference = request
            .reference
            .clone()
            .unwrap_or_else(|| generate_reference(REFERENCE_PREFIX));

        let wire_amount = to_wire_amount(FLUTTERWAVE_CURRENCIES, &request.amount)?;

        tracing::info!(
            gateway = FLUTTERWAVE,
            reference = %reference,
            amount = %request.amount,
            "Initiating payment"
        );

        let body = self.payment_body(&request, &reference, wire_amount);
        let raw = self.http.post_json("/payments", &body).await?;
        let link: FlutterwavePaymentLink = unwrap_envelope(&raw)?;

        tracing::info!(gateway = FLUTTERWAVE, reference = %reference, "Payment initiated");

        Ok(InitiatePaymentResponse {
            reference,
            status: PaymentStatus::Pending,
            amount: request.amount,
            authorization_url: Some(link.link),
            access_code: None,
            client_secret: None,
            gateway_transaction_id: None,
            raw: Some(raw),
        })
    }

    async fn verify_payment(
        &self,
        request: VerifyPaymentRequest,
    ) -> PaymentResult<VerifyPaymentResponse> {
        tracing::info!(gateway = FLUTTERWAVE, reference = %request.reference, "Verifying payment");

        let (transaction, raw) = self.fetch_transaction(&request.reference).await?;
        let verification = self.to_verification(&transaction, raw)?;

        tracing::info!(
            gateway = FLUTTERWAVE,
            reference = %verification.reference,
            status = %verification.status,
            "Payment verified"
        );
        Ok(verification)
    }

    async fn get_payment(&self, request: GetPaymentRequest) -> PaymentResult<GetPaymentResponse> {
        tracing::info!(gateway = FLUTTERWAVE, reference = %request.reference, "Fetching payment");

        let (transaction, raw) = self.fetch_transaction(&request.reference).await?;

        Ok(GetPaymentResponse {
            authorization: transaction.card.as_ref().and_then(to_authorization),
            created_at: parse_timestamp(transaction.created_at.as_deref()),
            metadata: transaction.meta.clone().filter(|m| !m.is_null()),
            verification: self.to_verification(&transaction, raw)?,
        })
    }

    async fn refund_payment(
        &self,
        request: RefundPaymentRequest,
    ) -> PaymentResult<RefundPaymentResponse> {
        request.validate()?;

        let payment = self
            .get_payment(GetPaymentRequest::new(request.reference.clone()))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PaymentError::not_found(&request.reference)
                        .with_gateway(FLUTTERWAVE)
                        .with_details(json!({
                            "reference": request.reference,
                            "operation": "refund_payment",
                        }))
                } else {
                    e
                }
            })?;

        let transaction_id = payment
            .verification
            .gateway_transaction_id
            .as_deref()
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| {
                PaymentError::invalid_response(format!(
                    "Flutterwave transaction id for '{}' could not be resolved",
                    request.reference
                ))
                .with_gateway(FLUTTERWAVE)
            })?;

        let original = payment.amount();
        let amount = match &request.amount {
            Some(amount) => {
                check_refund_amount(amount, &original)?;
                Some(to_wire_amount_unchecked(FLUTTERWAVE_CURRENCIES, amount)?)
            }
            None => None,
        };

        tracing::info!(
            gateway = FLUTTERWAVE,
            reference = %request.reference,
            transaction_id,
            partial = amount.is_some(),
            "Refunding payment"
        );

        let body = FlutterwaveRefundBody {
            id: transaction_id,
            amount,
            comments: request.reason.clone(),
        };
        let raw = self.http.post_json("/refunds", &body).await?;
        let refund: FlutterwaveRefund = unwrap_envelope(&raw)?;

        let refunded = match refund.amount_refunded.or(amount) {
            Some(value) => from_wire_amount(FLUTTERWAVE_CURRENCIES, original.currency, value)?,
            None => original,
        };

        Ok(RefundPaymentResponse {
            reference: request.reference,
            refund_reference: refund.id.to_string(),
            refunded_amount: refunded,
            status: map_refund_status(&refund.status),
            raw: Some(raw),
        })
    }

    async fn cancel_payment(
        &self,
        request: CancelPaymentRequest,
    ) -> PaymentResult<CancelPaymentResponse> {
        tracing::warn!(
            gateway = FLUTTERWAVE,
            reference = %request.reference,
            "Flutterwave has no cancel endpoint; reporting current status"
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
        FLUTTERWAVE
    }

    fn is_ready(&self) -> bool {
        self.http.config().has_secret()
    }
}
