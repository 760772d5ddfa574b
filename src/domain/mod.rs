//! Domain layer containing payment types and rules.
//!
//! # Module Organization
//!
//! - `payment` - Money and currencies, request/response shapes, unified
//!   status vocabulary, reference generation and the error taxonomy

pub mod payment;
