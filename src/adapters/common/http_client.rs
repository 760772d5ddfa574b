//! Thin HTTP client bound to one gateway's REST surface.
//!
//! Handles authentication, timeouts and error classification; adapters only
//! build paths and bodies and decode the JSON they get back.

use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error_classifier::{classify_transport_error, http_status_error, MessageExtractor};
use super::gateway_config::GatewayConfig;
use crate::domain::payment::{PaymentError, PaymentResult};

/// How the secret key is presented to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <secret>`
    Bearer,

    /// HTTP basic auth with the secret as username and no password.
    Basic,
}

pub struct GatewayHttpClient {
    gateway: &'static str,
    config: GatewayConfig,
    auth: AuthScheme,
    extract_message: MessageExtractor,
    client: Client,
}

impl GatewayHttpClient {
    pub fn new(
        gateway: &'static str,
        config: GatewayConfig,
        auth: AuthScheme,
        extract_message: MessageExtractor,
    ) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                PaymentError::configuration(format!("Failed to create HTTP client: {}", e))
                    .with_gateway(gateway)
            })?;

        Ok(Self {
            gateway,
            config,
            auth,
            extract_message,
            client,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> PaymentResult<Value> {
        let builder = self.client.get(self.url(path));
        let builder = if query.is_empty() {
            builder
        } else {
            builder.query(query)
        };
        self.execute(builder).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PaymentResult<Value> {
        self.execute(self.client.post(self.url(path)).json(body))
            .await
    }

    /// POST an `application/x-www-form-urlencoded` body. Keys may repeat.
    pub async fn post_form(&self, path: &str, form: &[(String, String)]) -> PaymentResult<Value> {
        self.execute(self.client.post(self.url(path)).form(form))
            .await
    }

    async fn execute(&self, builder: RequestBuilder) -> PaymentResult<Value> {
        let secret = self.config.secret_key().expose_secret();
        let builder = match self.auth {
            AuthScheme::Bearer => builder.bearer_auth(secret),
            AuthScheme::Basic => builder.basic_auth(secret, None::<&str>),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| classify_transport_error(self.gateway, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(self.gateway, &e))?;

        if !status.is_success() {
            tracing::warn!(
                gateway = self.gateway,
                status = status.as_u16(),
                "Gateway returned error status"
            );
            return Err(http_status_error(
                self.gateway,
                status,
                &body,
                self.extract_message,
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::invalid_response(format!(
                "{} returned an undecodable body: {}",
                self.gateway, e
            ))
            .with_gateway(self.gateway)
        })
    }
}

/// Decode a gateway body into its typed shape.
pub fn decode<T: DeserializeOwned>(gateway: &str, body: &Value) -> PaymentResult<T> {
    T::deserialize(body).map_err(|e| {
        PaymentError::invalid_response(format!("Unexpected {} response shape: {}", gateway, e))
            .with_gateway(gateway)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentErrorKind;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Envelope {
        status: bool,
        data: Option<Value>,
    }

    #[test]
    fn decode_reads_typed_body() {
        let envelope: Envelope = decode("paystack", &json!({"status": true, "data": {"a": 1}})).unwrap();
        assert!(envelope.status);
        assert_eq!(envelope.data.unwrap()["a"], 1);
    }

    #[test]
    fn decode_failure_is_invalid_response() {
        let err = decode::<Envelope>("paystack", &json!({"status": "yes"})).unwrap_err();
        assert_eq!(err.kind, PaymentErrorKind::InvalidResponse);
        assert_eq!(err.gateway.as_deref(), Some("paystack"));
    }

    #[test]
    fn client_builds_with_configured_timeout() {
        let config = GatewayConfig::new("sk_test", "http://localhost:1")
            .with_timeout(std::time::Duration::from_millis(250));
        let client = GatewayHttpClient::new("paystack", config, AuthScheme::Bearer, |_| None).unwrap();
        assert_eq!(client.url("/refund"), "http://localhost:1/refund");
        assert_eq!(client.config().timeout().as_millis(), 250);
    }
}
