//! Request context carried by every proxy.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

/// Request context property holding the address the proxy sends requests to.
pub const ENDPOINT_ADDRESS_PROPERTY: &str = "javax.xml.ws.service.endpoint.address";

/// Conversion of a boxed proxy into a plain `Any` box.
///
/// Implemented for every `Send + Sync + 'static` type; it lets the container
/// store a proxy that was produced as `Box<dyn BindingProvider>`.
pub trait AsAny: Any + Send + Sync {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
    fn as_any(&self) -> &(dyn Any + Send + Sync);
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}

/// A proxy whose per-request properties can be read and changed.
pub trait BindingProvider: AsAny {
    fn request_context(&self) -> &RequestContext;
}

/// Live, mutable request properties of a proxy.
///
/// Reads and writes go through a lock, so a proxy shared behind an `Arc`
/// can still be re-pointed at another endpoint.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{RequestContext, ENDPOINT_ADDRESS_PROPERTY};
///
/// let ctx = RequestContext::with_endpoint_address("http://localhost:8080/weather");
/// assert_eq!(ctx.endpoint_address().as_deref(), Some("http://localhost:8080/weather"));
///
/// ctx.insert(ENDPOINT_ADDRESS_PROPERTY, "http://test/weather");
/// assert_eq!(ctx.get(ENDPOINT_ADDRESS_PROPERTY).as_deref(), Some("http://test/weather"));
/// ```
#[derive(Default)]
pub struct RequestContext {
    properties: RwLock<HashMap<String, String>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint_address(address: impl Into<String>) -> Self {
        let ctx = Self::new();
        ctx.insert(ENDPOINT_ADDRESS_PROPERTY, address);
        ctx
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.properties.read().get(key).cloned()
    }

    /// Sets a property, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.properties.write().remove(key)
    }

    pub fn endpoint_address(&self) -> Option<String> {
        self.get(ENDPOINT_ADDRESS_PROPERTY)
    }

    pub fn len(&self) -> usize {
        self.properties.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.read().is_empty()
    }
}

impl Clone for RequestContext {
    fn clone(&self) -> Self {
        Self {
            properties: RwLock::new(self.properties.read().clone()),
        }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.properties.read().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Port {
        ctx: RequestContext,
    }

    impl BindingProvider for Port {
        fn request_context(&self) -> &RequestContext {
            &self.ctx
        }
    }

    #[test]
    fn boxed_proxy_downcasts_to_concrete_type() {
        let boxed: Box<dyn BindingProvider> = Box::new(Port { ctx: RequestContext::with_endpoint_address("http://a") });
        assert!((*boxed).as_any().is::<Port>());

        let any = boxed.into_any();
        let port = any.downcast::<Port>().ok().unwrap();
        assert_eq!(port.ctx.endpoint_address().as_deref(), Some("http://a"));
    }

    #[test]
    fn clone_detaches_properties() {
        let ctx = RequestContext::with_endpoint_address("http://a");
        let copy = ctx.clone();
        ctx.insert(ENDPOINT_ADDRESS_PROPERTY, "http://b");
        assert_eq!(copy.endpoint_address().as_deref(), Some("http://a"));
        assert_eq!(ctx.remove(ENDPOINT_ADDRESS_PROPERTY).as_deref(), Some("http://b"));
        assert!(ctx.is_empty());
    }
}
