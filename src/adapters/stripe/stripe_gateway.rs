//! Stripe gateway adapter.
//!
//! Uses the PaymentIntents API. Initiation returns a client secret for
//! client-side confirmation instead of a redirect URL. Stripe does not know the
//! caller's reference, so it is stored in `metadata[reference]` and lookups go
//! through the search API. Refunds and cancellations address the intent id.
//!
//! Requests are form-encoded and authenticated with the secret key as the
//! basic-auth username.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::adapters::common::amounts::{
    check_refund_amount, from_wire_amount, to_wire_amount, to_wire_amount_unchecked, wire_to_i64,
};
use crate::adapters::common::error_classifier::nested_error_message;
use crate::adapters::common::status_map::{
    channel_from_wire, channels_to_wire, map_refund_status, map_status,
};
use crate::adapters::common::{
    decode, parse_currency, AuthScheme, ChannelTable, CurrencyRule, GatewayConfig,
    GatewayHttpClient, StatusTable,
};
use crate::domain::payment::{
    generate_reference, validate_reference, CancelPaymentRequest, CancelPaymentResponse, Currency,
    Customer, GetPaymentRequest, GetPaymentResponse, InitiatePaymentRequest,
    InitiatePaymentResponse, PaymentAuthorization, PaymentChannel, PaymentError, PaymentResult,
    PaymentStatus, RefundPaymentRequest, RefundPaymentResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
use crate::ports::{GatewayRegistration, PaymentGateway};

use super::types::{StripeCharge, StripePaymentIntent, StripeRefund, StripeSearchResult};

/// Registry name.
pub const STRIPE: &str = "stripe";

pub const STRIPE_BASE_URL: &str = "https://api.stripe.com";

const REFERENCE_PREFIX: &str = "STR";

/// Supported currencies; minimums are in wire units.
pub const STRIPE_CURRENCIES: &[CurrencyRule] = &[
    CurrencyRule::minor(Currency::USD, 100, 50),
    CurrencyRule::minor(Currency::EUR, 100, 50),
    CurrencyRule::minor(Currency::GBP, 100, 30),
    CurrencyRule::minor(Currency::CAD, 100, 50),
    CurrencyRule::minor(Currency::AUD, 100, 50),
    CurrencyRule::zero_decimal(Currency::JPY, 50),
];

const STATUSES: StatusTable = &[
    ("succeeded", PaymentStatus::Success),
    ("canceled", PaymentStatus::Abandoned),
    ("processing", PaymentStatus::Pending),
    ("requires_payment_method", PaymentStatus::Pending),
    ("requires_confirmation", PaymentStatus::Pending),
    ("requires_action", PaymentStatus::Pending),
    ("requires_capture", PaymentStatus::Pending),
];

const CHANNELS: ChannelTable = &[(PaymentChannel::Card, "card")];

/// Map a raw PaymentIntent status.
pub fn map_stripe_status(raw: &str) -> PaymentStatus {
    map_status(STRIPE, STATUSES, raw)
}

/// Stripe adapter.
pub struct StripeGateway {
    http: GatewayHttpClient,
}

impl StripeGateway {
    /// Fails with a configuration error when the secret key is missing.
    pub fn new(config: GatewayConfig) -> PaymentResult<Self> {
        if !config.has_secret() {
            return Err(
                PaymentError::configuration("Stripe secret key is required").with_gateway(STRIPE),
            );
        }

        let http = GatewayHttpClient::new(STRIPE, config, AuthScheme::Basic, nested_error_message)?;
        Ok(Self { http })
    }

    pub fn from_registration(registration: &GatewayRegistration) -> PaymentResult<Self> {
        Self::new(GatewayConfig::from_registration(
            &registration.config,
            STRIPE_BASE_URL,
        )?)
    }

    fn intent_params(
        &self,
        request: &InitiatePaymentRequest,
        reference: &str,
        wire_amount: i64,
    ) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), wire_amount.to_string()),
            (
                "currency".to_string(),
                request.amount.currency.code().to_ascii_lowercase(),
            ),
        ];

        let requested = request.channels.as_deref().unwrap_or_default();
        let mut methods = channels_to_wire(STRIPE, CHANNELS, requested);
        if methods.is_empty() {
            methods.push("card");
        }
        for method in methods {
            params.push(("payment_method_types[]".to_string(), method.to_string()));
        }

        params.push(("receipt_email".to_string(), request.customer.email.clone()));

        if let Some(Value::Object(metadata)) = &request.metadata {
            // `metadata[reference]` is reserved for the lookup key.
            for (key, value) in metadata.iter().filter(|(key, _)| key.as_str() != "reference") {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                params.push((format!("metadata[{}]", key), value));
            }
        }
        if let Some(name) = request.customer.full_name() {
            params.push(("metadata[customer_name]".to_string(), name));
        }
        params.push(("metadata[reference]".to_string(), reference.to_string()));

        if let Some(description) = &request.description {
            params.push(("description".to_string(), description.clone()));
        }

        params
    }

    /// Find the intent carrying `metadata[reference]`.
    async fn find_intent(&self, reference: &str) -> PaymentResult<(StripePaymentIntent, Value)> {
        validate_reference(reference)?;

        let query = format!("metadata['reference']:'{}'", reference);
        let raw = self
            .http
            .get(
                "/v1/payment_intents/search",
                &[("query", query.as_str()), ("expand[]", "data.latest_charge")],
            )
            .await?;

        let page: StripeSearchResult<StripePaymentIntent> = decode(STRIPE, &raw)?;
        if page.data.len() > 1 {
            tracing::warn!(
                gateway = STRIPE,
                reference = %reference,
                matches = page.data.len(),
                "Several payment intents share a reference, using the most recent"
            );
        }

        let intent = page
            .data
            .into_iter()
            .max_by_key(|intent| intent.created.unwrap_or_default())
            .ok_or_else(|| PaymentError::not_found(reference).with_gateway(STRIPE))?;

        let raw_intent = raw
            .get("data")
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item.get("id").and_then(Value::as_str) == Some(intent.id.as_str()))
            })
            .cloned()
            .unwrap_or(raw);

        Ok((intent, raw_intent))
    }

    fn to_verification(
        &self,
        reference: &str,
        intent: &StripePaymentIntent,
        raw: Value,
    ) -> PaymentResult<VerifyPaymentResponse> {
        let currency = parse_currency(STRIPE, &intent.currency)?;
        let amount = from_wire_amount(STRIPE_CURRENCIES, currency, intent.amount)?;
        let status = map_stripe_status(&intent.status);
        let charge = intent.charge();

        let channel = charge
            .and_then(|c| c.payment_method_details.as_ref())
            .map(|details| details.method_type.as_str())
            .or_else(|| intent.payment_method_types.first().map(String::as_str))
            .and_then(|method| channel_from_wire(CHANNELS, method));

        let paid_at = match (status, charge) {
            (PaymentStatus::Success, Some(charge)) => {
                DateTime::<Utc>::from_timestamp(charge.created, 0)
            }
            _ => None,
        };

        Ok(VerifyPaymentResponse {
            reference: reference.to_string(),
            status,
            amount,
            channel,
            paid_at,
            customer: customer_of(intent, charge),
            gateway_transaction_id: Some(intent.id.clone()),
            gateway_response: gateway_response_of(intent, charge),
            raw: Some(raw),
        })
    }
}

fn customer_of(intent: &StripePaymentIntent, charge: Option<&StripeCharge>) -> Option<Customer> {
    let billing = charge.and_then(|c| c.billing_details.as_ref());
    let email = billing
        .and_then(|b| b.email.clone())
        .or_else(|| intent.receipt_email.clone())?;

    let (first_name, last_name) = match billing.and_then(|b| b.name.as_deref()) {
        Some(name) => match name.trim().split_once(' ') {
            Some((first, last)) => (Some(first.to_string()), Some(last.to_string())),
            None => (Some(name.trim().to_string()), None),
        },
        None => (None, None),
    };

    Some(Customer {
        email,
        first_name,
        last_name,
        phone: billing.and_then(|b| b.phone.clone()),
        metadata: None,
    })
}

fn gateway_response_of(intent: &StripePaymentIntent, charge: Option<&StripeCharge>) -> Option<String> {
    charge
        .and_then(|c| {
            c.failure_message
                .clone()
                .or_else(|| c.outcome.as_ref().and_then(|o| o.seller_message.clone()))
        })
        .or_else(|| {
            intent
                .last_payment_error
                .as_ref()
                .and_then(|e| e.message.clone())
        })
}

fn to_authorization(charge: &StripeCharge) -> Option<PaymentAuthorization> {
    let card = charge
        .payment_method_details
        .as_ref()
        .and_then(|details| details.card.as_ref())?;

    let mapped = PaymentAuthorization {
        authorization_code: None,
        bin: None,
        last4: card.last4.clone(),
        exp_month: card.exp_month.map(|m| format!("{:02}", m)),
        exp_year: card.exp_year.map(|y| y.to_string()),
        card_type: card.funding.clone(),
        brand: card.brand.clone(),
        issuer: None,
        country_code: card.country.clone(),
        reusable: None,
    };
    (!mapped.is_empty()).then_some(mapped)
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> PaymentResult<InitiatePaymentResponse> {
        request.validate()?;
        let reference = request
            .reference
            .clone()
            .unwrap_or_else(|| generate_reference(REFERENCE_PREFIX));

        let wire_amount = wire_to_i64(to_wire_amount(STRIPE_CURRENCIES, &request.amount)?)?;

        tracing::info!(
            gateway = STRIPE,
            reference = %reference,
            amount = %request.amount,
            wire_amount,
            "Initiating payment"
        );

        let params = self.intent_params(&request, &reference, wire_amount);
        let raw = self.http.post_form("/v1/payment_intents", &params).await?;
        let intent: StripePaymentIntent = decode(STRIPE, &raw)?;

        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            PaymentError::invalid_response("Stripe payment intent has no client secret")
                .with_gateway(STRIPE)
        })?;

        tracing::info!(
            gateway = STRIPE,
            reference = %reference,
            payment_intent = %intent.id,
            "Payment initiated"
        );

        Ok(InitiatePaymentResponse {
            reference,
            status: PaymentStatus::Pending,
            amount: request.amount,
            authorization_url: None,
            access_code: None,
            client_secret: Some(client_secret),
            gateway_transaction_id: Some(intent.id),
            raw: Some(raw),
        })
    }

    async fn verify_payment(
        &self,
        request: VerifyPaymentRequest,
    ) -> PaymentResult<VerifyPaymentResponse> {
        tracing::info!(gateway = STRIPE, reference = %request.reference, "Verifying payment");

        let (intent, raw) = self.find_intent(&request.reference).await?;
        let verification = self.to_verification(&request.reference, &intent, raw)?;

        tracing::info!(
            gateway = STRIPE,
            reference = %verification.reference,
            status = %verification.status,
            "Payment verified"
        );
        Ok(verification)
    }

    async fn get_payment(&self, request: GetPaymentRequest) -> PaymentResult<GetPaymentResponse> {
        tracing::info!(gateway = STRIPE, reference = %request.reference, "Fetching payment");

        let (intent, raw) = self.find_intent(&request.reference).await?;

        let metadata = if intent.metadata.is_empty() {
            None
        } else {
            Some(json!(intent.metadata))
        };

        Ok(GetPaymentResponse {
            authorization: intent.charge().and_then(to_authorization),
            created_at: intent
                .created
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            metadata,
            verification: self.to_verification(&request.reference, &intent, raw)?,
        })
    }

    async fn refund_payment(
        &self,
        request: RefundPaymentRequest,
    ) -> PaymentResult<RefundPaymentResponse> {
        request.validate()?;

        let payment = self
            .get_payment(GetPaymentRequest::new(request.reference.clone()))
            .await?;

        let intent_id = payment
            .verification
            .gateway_transaction_id
            .clone()
            .ok_or_else(|| PaymentError::not_found(&request.reference).with_gateway(STRIPE))?;

        let mut params = vec![("payment_intent".to_string(), intent_id.clone())];
        if let Some(amount) = &request.amount {
            check_refund_amount(amount, &payment.amount())?;
            let wire = wire_to_i64(to_wire_amount_unchecked(STRIPE_CURRENCIES, amount)?)?;
            params.push(("amount".to_string(), wire.to_string()));
        }
        if let Some(reason) = &request.reason {
            params.push(("metadata[reason]".to_string(), reason.clone()));
        }
        params.push(("metadata[reference]".to_string(), request.reference.clone()));

        tracing::info!(
            gateway = STRIPE,
            reference = %request.reference,
            payment_intent = %intent_id,
            partial = request.amount.is_some(),
            "Refunding payment"
        );

        let raw = self.http.post_form("/v1/refunds", &params).await?;
        let refund: StripeRefund = decode(STRIPE, &raw)?;

        let currency = parse_currency(STRIPE, &refund.currency)?;
        let refunded_amount = from_wire_amount(STRIPE_CURRENCIES, currency, refund.amount)?;

        Ok(RefundPaymentResponse {
            reference: request.reference,
            refund_reference: refund.id,
            refunded_amount,
            status: map_refund_status(&refund.status),
            raw: Some(raw),
        })
    }

    async fn cancel_payment(
        &self,
        request: CancelPaymentRequest,
    ) -> PaymentResult<CancelPaymentResponse> {
        let (intent, raw) = self.find_intent(&request.reference).await?;

        if !intent.is_cancellable() {
            tracing::info!(
                gateway = STRIPE,
                reference = %request.reference,
                status = %intent.status,
                "Payment intent can no longer be cancelled"
            );
            return Ok(CancelPaymentResponse {
                reference: request.reference,
                status: map_stripe_status(&intent.status),
                cancelled: false,
                raw: Some(raw),
            });
        }

        tracing::info!(
            gateway = STRIPE,
            reference = %request.reference,
            payment_intent = %intent.id,
            "Cancelling payment intent"
        );

        let params = vec![(
            "cancellation_reason".to_string(),
            "requested_by_customer".to_string(),
        )];
        let raw = self
            .http
            .post_form(&format!("/v1/payment_intents/{}/cancel", intent.id), &params)
            .await?;
        let cancelled: StripePaymentIntent = decode(STRIPE, &raw)?;

        Ok(CancelPaymentResponse {
            reference: request.reference,
            status: map_stripe_status(&cancelled.status),
            cancelled: cancelled.status == "canceled",
            raw: Some(raw),
        })
    }

    fn gateway_name(&self) -> &str {
        STRIPE
    }

    fn is_ready(&self) -> bool {
        self.http.config().has_secret()
    }
}
