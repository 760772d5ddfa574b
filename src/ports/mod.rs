//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - Port every payment processor adapter implements
//! - `GatewayFactory` - Builds an adapter from its `GatewayRegistration`

mod payment_gateway;

pub use payment_gateway::{GatewayFactory, GatewayRegistration, PaymentGateway};
