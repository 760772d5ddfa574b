//! Builds a `GatewayManager` from configuration.

use crate::adapters::builtin_factories;
use crate::config::GatewaysConfig;

use super::GatewayManager;

/// Register the built-in gateways described by `config`.
///
/// Gateways whose construction fails are logged and skipped. A configured
/// default that did not come up is logged and left unset, so resolution falls
/// back to the first registered gateway.
pub fn build_manager(config: &GatewaysConfig) -> GatewayManager {
    let mut manager = GatewayManager::new();
    manager.set_fallback_enabled(config.fallback_enabled);

    for registration in config.registrations() {
        manager.add_registration(registration);
    }
    for (name, factory) in builtin_factories() {
        manager.register_factory(name, factory);
    }

    if let Some(name) = config.default_gateway.as_deref() {
        if let Err(error) = manager.set_default_gateway(name) {
            tracing::warn!(gateway = %name, error = %error, "Configured default gateway unavailable");
        }
    }

    tracing::info!(
        gateways = ?manager.get_available_gateways(),
        ready = ?manager.get_ready_gateways(),
        default = ?manager.default_gateway_name(),
        fallback = manager.is_fallback_enabled(),
        "Payment gateways initialized"
    );

    manager
}
