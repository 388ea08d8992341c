//! Service provider module for dependency injection.
//!
//! This module contains the ServiceProvider type and related functionality
//! for resolving registered services from the DI container.

use std::any::Any;
use std::sync::Arc;

use tracing::trace;

use crate::{DiResult, DiError, Key, Lifetime};
use crate::registration::{Registry, Registration, AnyArc};
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub use context::ResolverContext;

/// Service provider for resolving dependencies from the DI container.
///
/// Resolves services according to their registered lifetimes: singletons
/// are built on first request and cached, transients are built on every
/// request.
///
/// # Thread Safety
///
/// ServiceProvider is thread-safe and can be cloned cheaply (it uses `Arc`
/// internally). A singleton's factory runs under that singleton's lock, so
/// concurrent first requests observe a single instance.
///
/// # Examples
///
/// ```
/// use ferrous_sei::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Endpoint { url: String }
/// struct Client { endpoint: Arc<Endpoint> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Endpoint { url: "http://localhost/ws".to_string() });
/// collection.add_transient_factory::<Client, _>(|resolver| {
///     Client { endpoint: resolver.get_required::<Endpoint>() }
/// });
///
/// let provider = collection.build();
/// let client = provider.get_required::<Client>();
/// assert_eq!(client.endpoint.url, "http://localhost/ws");
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub registry: Registry,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ProviderInner { registry }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    pub(crate) fn resolve_singleton(&self, reg: &Registration) -> DiResult<AnyArc> {
        if let Some(slot) = &reg.single_runtime {
            let mut guard = slot.lock();
            if let Some(value) = guard.as_ref() {
                return Ok(value.clone());
            }

            let ctx = ResolverContext::new(self);
            let value = (reg.ctor)(&ctx)?;
            *guard = Some(value.clone());
            return Ok(value);
        }

        let ctx = ResolverContext::new(self);
        (reg.ctor)(&ctx)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        for (k, r) in self.inner().registry.iter() {
            s.push_str(&format!("  {:?}: {:?}\n", k, r.lifetime));
        }
        s
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>> {
        let reg = self
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;

        trace!(service = key.display_name(), name = ?key.service_name(), lifetime = ?reg.lifetime, "resolving");
        match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }

    fn contains(&self, key: &Key) -> bool {
        self.inner().registry.contains_key(key)
    }
}

impl Resolver for ServiceProvider {}
