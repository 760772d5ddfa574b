//! Payment Gateways - Unified payment processor integrations
//!
//! This crate exposes one contract for initiating, verifying, retrieving,
//! refunding and cancelling payments across Paystack, Flutterwave and Stripe,
//! and a registry that picks a working gateway by priority when one is down.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
