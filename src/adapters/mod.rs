//! Adapters - Implementations of the `PaymentGateway` port.
//!
//! - `common` - amount normalizer, status/channel mapper, error classifier,
//!   HTTP client and per-gateway configuration shared by every adapter
//! - `paystack`, `flutterwave`, `stripe` - processor adapters
//! - `mock` - in-memory gateway for tests

pub mod common;
pub mod flutterwave;
pub mod mock;
pub mod paystack;
pub mod stripe;

use std::sync::Arc;

use crate::domain::payment::PaymentResult;
use crate::ports::{GatewayFactory, GatewayRegistration, PaymentGateway};

pub use flutterwave::FlutterwaveGateway;
pub use mock::MockPaymentGateway;
pub use paystack::PaystackGateway;
pub use stripe::StripeGateway;

/// Factory building a `PaystackGateway` from its registration.
pub fn paystack_factory() -> GatewayFactory {
    Arc::new(
        |registration: &GatewayRegistration| -> PaymentResult<Arc<dyn PaymentGateway>> {
            let gateway = PaystackGateway::from_registration(registration)?;
            Ok(Arc::new(gateway) as Arc<dyn PaymentGateway>)
        },
    )
}

/// Factory building a `FlutterwaveGateway` from its registration.
pub fn flutterwave_factory() -> GatewayFactory {
    Arc::new(
        |registration: &GatewayRegistration| -> PaymentResult<Arc<dyn PaymentGateway>> {
            let gateway = FlutterwaveGateway::from_registration(registration)?;
            Ok(Arc::new(gateway) as Arc<dyn PaymentGateway>)
        },
    )
}

/// Factory building a `StripeGateway` from its registration.
pub fn stripe_factory() -> GatewayFactory {
    Arc::new(
        |registration: &GatewayRegistration| -> PaymentResult<Arc<dyn PaymentGateway>> {
            let gateway = StripeGateway::from_registration(registration)?;
            Ok(Arc::new(gateway) as Arc<dyn PaymentGateway>)
        },
    )
}

/// The three built-in factories, keyed by registry name.
pub fn builtin_factories() -> Vec<(&'static str, GatewayFactory)> {
    vec![
        (paystack::PAYSTACK, paystack_factory()),
        (flutterwave::FLUTTERWAVE, flutterwave_factory()),
        (stripe::STRIPE, stripe_factory()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn factories_build_named_gateways() {
        for (name, factory) in builtin_factories() {
            let registration =
                GatewayRegistration::new(name, json!({"secret_key": "sk_test_or_FLWSECK"}));
            let gateway = factory(&registration).unwrap();
            assert_eq!(gateway.gateway_name(), name);
            assert!(gateway.is_ready());
        }
    }

    #[test]
    fn factories_reject_missing_credentials() {
        for (name, factory) in builtin_factories() {
            let registration = GatewayRegistration::new(name, json!({}));
            let err = factory(&registration).err().unwrap();
            assert!(err.is_fatal(), "{} should refuse to build", name);
        }
    }
}
