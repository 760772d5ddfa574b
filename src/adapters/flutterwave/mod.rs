//! Flutterwave adapter (pan-African currencies plus USD, EUR, GBP).
//!
//! Bearer-authenticated JSON API at `https://api.flutterwave.com/v3`. Amounts
//! are sent in major units.

mod flutterwave_gateway;
mod types;

pub use flutterwave_gateway::{
    map_flutterwave_status, FlutterwaveGateway, FLUTTERWAVE, FLUTTERWAVE_BASE_URL,
    FLUTTERWAVE_CURRENCIES,
};
