//! Paystack adapter (NGN, GHS, ZAR, KES, USD).
//!
//! Bearer-authenticated JSON API at `https://api.paystack.co`. Amounts are
//! sent in minor units.

mod paystack_gateway;
mod types;

pub use paystack_gateway::{
    map_paystack_status, PaystackGateway, PAYSTACK, PAYSTACK_BASE_URL, PAYSTACK_CURRENCIES,
};
