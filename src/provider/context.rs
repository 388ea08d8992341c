//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factory functions to resolve dependencies.

use std::any::Any;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;
use crate::traits::{Resolver, ResolverCore};

/// Context passed to factory functions for resolving dependencies.
///
/// ResolverContext wraps the resolver that is running the factory, so
/// factories stay independent of the concrete resolver type. The factory a
/// [`SeiProxyModule`](crate::SeiProxyModule) registers for the proxy provider
/// receives one of these and reads its endpoint overrides through it.
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
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Endpoint { url: "http://localhost/ws".to_string() });
/// services.add_transient_factory::<Client, _>(|resolver| {
///     Client { endpoint: resolver.get_required::<Endpoint>() }
/// });
///
/// let client = services.build().get_required::<Client>();
/// assert_eq!(client.endpoint.url, "http://localhost/ws");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>> {
        self.resolver.resolve_any(key)
    }

    fn contains(&self, key: &Key) -> bool {
        self.resolver.contains(key)
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
