//! In-memory gateway double.

mod mock_payment_gateway;

pub use mock_payment_gateway::{MethodCall, MockPaymentGateway};
