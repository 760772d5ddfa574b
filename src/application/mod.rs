//! Application layer - gateway selection and orchestration.
//!
//! - `GatewayManager` - named, prioritized registry with default resolution
//!   and fallback
//! - `lookup` - find a payment across every ready gateway
//! - `bootstrap` - build the manager from configuration

pub mod bootstrap;
mod gateway_manager;
pub mod lookup;

pub use bootstrap::build_manager;
pub use gateway_manager::GatewayManager;
pub use lookup::{get_across_gateways, verify_across_gateways, LookupMatch, LookupOptions};
