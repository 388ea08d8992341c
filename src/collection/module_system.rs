//! Service module system for modular registration.
//!
//! This module provides traits and functionality for organizing service
//! registrations into reusable modules.

use crate::{ServiceCollection, DiResult};

/// A module that can register services with a ServiceCollection.
///
/// Registration may fail: [`SeiProxyModule`](crate::SeiProxyModule) refuses
/// to bind a service whose endpoint methods return no type or several types,
/// and [`EndpointOverrides`](crate::EndpointOverrides) is a module too.
///
/// # Example
///
/// ```rust
/// use ferrous_sei::{ServiceCollection, ServiceModule, ServiceCollectionExt, DiResult, Resolver};
///
/// struct EndpointModule;
///
/// impl ServiceModule for EndpointModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_named_singleton("demo.Weather.endpoint.url", "http://test/weather".to_string());
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let provider = ServiceCollection::new().add_module(EndpointModule)?.build();
/// assert!(provider.get_named_optional::<String>("demo.Weather.endpoint.url")?.is_some());
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Register this module's services with the ServiceCollection.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Extension trait for ServiceCollection that provides module registration
/// by value, for builder-style chaining.
pub trait ServiceCollectionExt {
    /// Add a module to the service collection.
    fn add_module<M: ServiceModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(mut self, module: M) -> DiResult<Self> {
        module.register_services(&mut self)?;
        Ok(self)
    }
}

/// Extension trait for ServiceCollection that provides in-place module
/// registration, matching the `&mut Self` registration methods.
pub trait ServiceCollectionModuleExt {
    /// Add a module to the service collection in-place.
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl ServiceCollectionModuleExt for ServiceCollection {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
