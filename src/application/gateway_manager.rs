//! Gateway Manager - Named, prioritized registry of payment gateways.
//!
//! Holds the adapters built at startup and picks one per call: by name, the
//! configured default, or the best ready adapter when fallback is enabled.
//!
//! # Example
//!
//! ```ignore
//! let mut manager = GatewayManager::new();
//! manager.add_registration(GatewayRegistration::new("paystack", config).with_priority(100));
//! manager.register_factory("paystack", paystack_factory());
//!
//! let gateway = manager.get_gateway_with_fallback(Some("paystack"))?;
//! ```
//!
//! Reads take `&self` and mutations take `&mut self`. Wrap the manager in a
//! `tokio::sync::RwLock` to reconfigure it while requests are in flight.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::payment::{PaymentError, PaymentResult};
use crate::ports::{GatewayFactory, GatewayRegistration, PaymentGateway};

/// Registry of payment gateways with default resolution and fallback.
pub struct GatewayManager {
    /// Built adapters in registration order.
    adapters: Vec<(String, Arc<dyn PaymentGateway>)>,
    factories: HashMap<String, GatewayFactory>,
    registrations: HashMap<String, GatewayRegistration>,
    default_name: Option<String>,
    fallback_enabled: bool,
}

impl Default for GatewayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayManager {
    /// Empty manager with fallback enabled.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
            factories: HashMap::new(),
            registrations: HashMap::new(),
            default_name: None,
            fallback_enabled: true,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Registration
    // ════════════════════════════════════════════════════════════════════════════

    /// Store a registration, building the adapter when its factory is known.
    pub fn add_registration(&mut self, registration: GatewayRegistration) {
        let name = registration.name.clone();
        self.registrations.insert(name.clone(), registration);
        self.try_build(&name);
    }

    /// Store a factory, building the adapter when an enabled registration exists.
    ///
    /// A factory that fails leaves the gateway unregistered; the failure is
    /// logged and the other gateways are unaffected.
    pub fn register_factory(&mut self, name: impl Into<String>, factory: GatewayFactory) {
        let name = name.into();
        self.factories.insert(name.clone(), factory);
        self.try_build(&name);
    }

    /// Register an already built adapter under `name`.
    ///
    /// Re-registering a name replaces the adapter in place, keeping its
    /// position in registration order.
    pub fn register_gateway(&mut self, name: impl Into<String>, gateway: Arc<dyn PaymentGateway>) {
        let name = name.into();
        tracing::info!(
            gateway = %name,
            ready = gateway.is_ready(),
            priority = self.priority_of(&name),
            "Payment gateway registered"
        );

        match self.adapters.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = gateway,
            None => self.adapters.push((name, gateway)),
        }
    }

    fn try_build(&mut self, name: &str) {
        let (Some(factory), Some(registration)) =
            (self.factories.get(name), self.registrations.get(name))
        else {
            return;
        };

        if !registration.enabled {
            tracing::info!(gateway = %name, "Payment gateway disabled, not building");
            return;
        }

        match factory(registration) {
            Ok(gateway) => self.register_gateway(name, gateway),
            Err(error) => {
                tracing::error!(
                    gateway = %name,
                    error = %error,
                    "Failed to construct payment gateway"
                );
            }
        }
    }

    /// Drop a gateway, its factory and its registration.
    ///
    /// Clears the default when it pointed at `name`; no other gateway is
    /// promoted in its place.
    pub fn remove_gateway(&mut self, name: &str) {
        self.adapters.retain(|(existing, _)| existing != name);
        self.factories.remove(name);
        self.registrations.remove(name);

        if self.default_name.as_deref() == Some(name) {
            self.default_name = None;
        }
        tracing::info!(gateway = %name, "Payment gateway removed");
    }

    /// Drop everything, including the default. Fallback setting is kept.
    pub fn clear(&mut self) {
        self.adapters.clear();
        self.factories.clear();
        self.registrations.clear();
        self.default_name = None;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Settings
    // ════════════════════════════════════════════════════════════════════════════

    pub fn set_default_gateway(&mut self, name: &str) -> PaymentResult<()> {
        if !self.contains(name) {
            return Err(PaymentError::configuration(format!(
                "Cannot set default: payment gateway '{name}' is not registered"
            )));
        }
        self.default_name = Some(name.to_string());
        Ok(())
    }

    pub fn default_gateway_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    pub fn set_fallback_enabled(&mut self, enabled: bool) {
        self.fallback_enabled = enabled;
    }

    pub fn is_fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }

    /// Registration priority, `0` when the gateway was registered directly.
    pub fn priority_of(&self, name: &str) -> i32 {
        self.registrations
            .get(name)
            .map(|registration| registration.priority)
            .unwrap_or(0)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Lookup
    // ════════════════════════════════════════════════════════════════════════════

    pub fn contains(&self, name: &str) -> bool {
        self.adapters.iter().any(|(existing, _)| existing == name)
    }

    /// A registered, ready gateway.
    pub fn get_gateway(&self, name: &str) -> PaymentResult<Arc<dyn PaymentGateway>> {
        let gateway = self
            .adapters
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, gateway)| Arc::clone(gateway))
            .ok_or_else(|| {
                PaymentError::configuration(format!(
                    "Payment gateway '{name}' is not registered"
                ))
            })?;

        if !gateway.is_ready() {
            return Err(PaymentError::configuration(format!(
                "Payment gateway '{name}' is not ready"
            ))
            .with_gateway(name));
        }
        Ok(gateway)
    }

    /// The configured default, else the first registered gateway.
    pub fn get_default_gateway(&self) -> PaymentResult<Arc<dyn PaymentGateway>> {
        if let Some(name) = self.default_name.as_deref() {
            return self.get_gateway(name);
        }
        match self.adapters.first() {
            Some((name, _)) => self.get_gateway(name),
            None => Err(PaymentError::configuration(
                "No payment gateways are registered",
            )),
        }
    }

    /// Resolve a gateway for one call.
    ///
    /// Order: `preferred` if ready, then the configured default, then every
    /// other ready gateway by descending priority (ties keep registration
    /// order). Returns `Ok(None)` only when fallback is enabled and nothing is
    /// ready. With fallback disabled the first failure is returned as is.
    pub fn get_gateway_with_fallback(
        &self,
        preferred: Option<&str>,
    ) -> PaymentResult<Option<Arc<dyn PaymentGateway>>> {
        let mut tried: Vec<&str> = Vec::new();

        if let Some(name) = preferred {
            match self.get_gateway(name) {
                Ok(gateway) => return Ok(Some(gateway)),
                Err(error) if !self.fallback_enabled => return Err(error),
                Err(error) => {
                    tracing::warn!(gateway = %name, error = %error, "Preferred payment gateway unavailable, falling back");
                    tried.push(name);
                }
            }
        }

        if let Some(name) = self.default_name.as_deref() {
            if preferred != Some(name) {
                match self.get_gateway(name) {
                    Ok(gateway) => return Ok(Some(gateway)),
                    Err(error) if !self.fallback_enabled => return Err(error),
                    Err(error) => {
                        tracing::warn!(gateway = %name, error = %error, "Default payment gateway unavailable, falling back");
                        tried.push(name);
                    }
                }
            }
        }

        if !self.fallback_enabled {
            return self.get_default_gateway().map(Some);
        }

        let next = self
            .ready_by_priority()
            .into_iter()
            .find(|(name, _)| !tried.contains(name))
            .map(|(_, gateway)| gateway);

        if next.is_none() {
            tracing::warn!("No ready payment gateway available");
        }
        Ok(next)
    }

    /// Ready gateways in fallback order: default first, then descending
    /// priority with ties in registration order.
    pub fn fallback_order(&self) -> Vec<(String, Arc<dyn PaymentGateway>)> {
        let mut ordered: Vec<(String, Arc<dyn PaymentGateway>)> = Vec::new();

        if let Some(name) = self.default_name.as_deref() {
            if let Ok(gateway) = self.get_gateway(name) {
                ordered.push((name.to_string(), gateway));
            }
        }

        for (name, gateway) in self.ready_by_priority() {
            if self.default_name.as_deref() != Some(name) {
                ordered.push((name.to_string(), gateway));
            }
        }
        ordered
    }

    fn ready_by_priority(&self) -> Vec<(&str, Arc<dyn PaymentGateway>)> {
        let mut ready: Vec<(&str, Arc<dyn PaymentGateway>)> = self
            .adapters
            .iter()
            .filter(|(_, gateway)| gateway.is_ready())
            .map(|(name, gateway)| (name.as_str(), Arc::clone(gateway)))
            .collect();

        // sort_by_key is stable, so equal priorities keep registration order.
        ready.sort_by_key(|(name, _)| Reverse(self.priority_of(name)));
        ready
    }

    /// Names of all registered gateways, in registration order.
    pub fn get_available_gateways(&self) -> Vec<String> {
        self.adapters.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Names of registered gateways that are ready, in registration order.
    pub fn get_ready_gateways(&self) -> Vec<String> {
        self.adapters
            .iter()
            .filter(|(_, gateway)| gateway.is_ready())
            .map(|(name, _)| name.clone())
            .collect()
    }
}
