//! Stripe adapter (USD, EUR, GBP, CAD, AUD, JPY).
//!
//! PaymentIntents over `https://api.stripe.com`, form-encoded, basic auth with
//! the secret key. Amounts are sent in minor units except for zero-decimal
//! currencies.

mod stripe_gateway;
mod types;

pub use stripe_gateway::{map_stripe_status, StripeGateway, STRIPE, STRIPE_BASE_URL, STRIPE_CURRENCIES};
