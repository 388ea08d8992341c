//! Service collection module for dependency injection.
//!
//! This module contains the ServiceCollection type and related functionality
//! for registering services and building service providers.

use std::any::TypeId;
use std::sync::Arc;

use crate::{DiResult, Key, Lifetime, ServiceDescriptor, ServiceProvider};
use crate::key::{key_of_named, key_of_type};
use crate::registration::{Registry, Registration, AnyArc, Ctor};
use crate::provider::ResolverContext;

pub mod module_system;
pub use module_system::*;

/// Registry of service bindings, consumed by [`build`](ServiceCollection::build).
pub struct ServiceCollection {
    registry: Registry,
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    // ----- Concrete Type Registrations -----

    /// Registers a singleton instance that will be shared across the entire application.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_sei::ServiceCollection;
    /// struct Config {
    ///     default_endpoint: String
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config {
    ///     default_endpoint: "http://localhost/ws".to_string()
    /// });
    /// ```
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.insert(key_of_type::<T>(), Lifetime::Singleton, Arc::new(ctor), Some(TypeId::of::<T>()))
    }

    /// Registers a named singleton instance.
    ///
    /// Named singletons are how endpoint overrides reach a proxy provider: the
    /// provider for `demo.Weather` looks up `String` named
    /// `demo.Weather.endpoint.url`, `Url` named `demo.Weather.wsdl`, and so on.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_sei::{ServiceCollection, Resolver};
    /// let mut services = ServiceCollection::new();
    /// services.add_named_singleton("demo.Weather.endpoint.url", "http://test/weather".to_string());
    ///
    /// let provider = services.build();
    /// let url = provider.get_named_required::<String>("demo.Weather.endpoint.url");
    /// assert_eq!(url.as_str(), "http://test/weather");
    /// ```
    pub fn add_named_singleton<T: 'static + Send + Sync>(&mut self, name: &str, value: T) -> &mut Self {
        let arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.insert(key_of_named::<T>(name), Lifetime::Singleton, Arc::new(ctor), Some(TypeId::of::<T>()))
    }

    /// Registers a singleton factory that creates the instance on first request.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_singleton_try_factory::<T, _>(move |r| Ok(factory(r)))
    }

    /// Registers a transient factory that creates a new instance on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_transient_try_factory::<T, _>(move |r| Ok(factory(r)))
    }

    /// Registers a fallible singleton factory.
    ///
    /// An error is returned to the caller and nothing is cached, so the next
    /// request runs the factory again.
    ///
    /// The factory runs while the singleton's slot is locked. It may resolve
    /// other services, but it must not resolve `T` itself, directly or through
    /// another singleton: there is no cycle detection, and the second request
    /// blocks on the held lock forever.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_sei::{ServiceCollection, Resolver, DiError};
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_try_factory::<u16, _>(|_| Err(DiError::NotFound("port")));
    ///
    /// let provider = services.build();
    /// assert!(provider.get::<u16>().is_err());
    /// ```
    pub fn add_singleton_try_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a fallible transient factory.
    pub fn add_transient_try_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let value: AnyArc = Arc::new(factory(r)?);
            Ok(value)
        };
        self.insert(key_of_type::<T>(), lifetime, Arc::new(ctor), Some(TypeId::of::<T>()))
    }

    /// Registers a type-erased constructor under an explicit key.
    ///
    /// Used when the bound type is only known at runtime, as with the port
    /// type a [`SeiProxyModule`](crate::SeiProxyModule) discovers from a
    /// service's endpoint methods. The constructor must produce a value whose
    /// `TypeId` matches the key.
    pub(crate) fn add_erased(&mut self, key: Key, lifetime: Lifetime, ctor: Ctor, impl_id: TypeId) -> &mut Self {
        self.insert(key, lifetime, ctor, Some(impl_id))
    }

    fn insert(&mut self, key: Key, lifetime: Lifetime, ctor: Ctor, impl_id: Option<TypeId>) -> &mut Self {
        self.registry.insert(key, Registration::new(lifetime, ctor, impl_id));
        self
    }

    // ----- Introspection -----

    /// Reports whether a binding exists for `key`.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    /// Number of bindings registered so far.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Describes every registration, in registration order.
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|(key, reg)| ServiceDescriptor {
                key: key.clone(),
                lifetime: reg.lifetime,
                impl_type_id: reg.impl_id,
            })
            .collect()
    }

    /// Builds the service provider.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(self.registry)
    }
}
