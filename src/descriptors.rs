//! Service descriptors for introspection and diagnostics.

use std::any::TypeId;
use crate::key::Key;
use crate::lifetime::Lifetime;

/// Service descriptor for introspection and diagnostics
///
/// Describes one registration in a [`ServiceCollection`](crate::ServiceCollection).
/// Handy for checking what a [`SeiProxyModule`](crate::SeiProxyModule) bound:
/// the port type shows up as a transient registration and the proxy provider
/// as a singleton.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{ServiceCollection, Lifetime};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42u32);
/// services.add_named_singleton("demo.Weather.endpoint.name", "WeatherPort".to_string());
///
/// let descriptors = services.get_service_descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let named = descriptors.iter().find(|d| d.is_named()).unwrap();
/// assert_eq!(named.service_name(), Some("demo.Weather.endpoint.name"));
/// assert_eq!(named.lifetime, Lifetime::Singleton);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The service key (type name with optional binding name)
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Implementation type ID (if available)
    pub impl_type_id: Option<TypeId>,
}

impl ServiceDescriptor {
    /// Get the binding name for named services, or None for unnamed services
    pub fn service_name(&self) -> Option<&str> {
        self.key.service_name()
    }

    /// Get the type name
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Check if this is a named service
    pub fn is_named(&self) -> bool {
        self.service_name().is_some()
    }
}
