//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// Proxy bindings use both: the [`SeiProxyProvider`](crate::SeiProxyProvider)
/// for a service is a singleton so its overrides are read once, while the
/// port type itself is transient so every request gets a fresh proxy.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Endpoints { default_url: String }
/// struct Call { id: u32 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Endpoints { default_url: "http://localhost/ws".to_string() });
/// services.add_transient_factory::<Call, _>(|_| Call { id: 7 });
///
/// let provider = services.build();
/// let e1 = provider.get_required::<Endpoints>();
/// let e2 = provider.get_required::<Endpoints>();
/// assert!(Arc::ptr_eq(&e1, &e2));
///
/// let c1 = provider.get_required::<Call>();
/// let c2 = provider.get_required::<Call>();
/// assert!(!Arc::ptr_eq(&c1, &c2));
/// assert_eq!(c1.id, c2.id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per provider, created on first request and cached
    Singleton,
    /// New instance per resolution, never cached
    Transient,
}
