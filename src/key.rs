//! Service key types for the dependency injection container.

use std::any::TypeId;
use std::sync::Arc;

/// Key for service storage and lookup.
///
/// Keys identify services in the container. A plain key is derived from a
/// type; a named key adds a string so several values of the same type can be
/// bound side by side. Proxy overrides rely on named keys: the WSDL location
/// of `demo.Weather` lives under `Url` named `demo.Weather.wsdl`, its endpoint
/// address under `String` named `demo.Weather.endpoint.url`.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{ServiceCollection, Resolver, Key};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42u32);
/// services.add_named_singleton("demo.Weather.endpoint.url", "http://test/weather".to_string());
///
/// let provider = services.build();
/// assert_eq!(*provider.get_required::<u32>(), 42);
/// let url = provider.get_named_optional::<String>("demo.Weather.endpoint.url").unwrap();
/// assert_eq!(url.as_deref().map(String::as_str), Some("http://test/weather"));
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Named concrete type key with TypeId, type name and binding name
    TypeNamed(TypeId, &'static str, Arc<str>),
}

impl Key {
    /// Get the type name for display
    ///
    /// ```rust
    /// use ferrous_sei::Key;
    /// use std::any::TypeId;
    ///
    /// let key = Key::TypeNamed(TypeId::of::<u32>(), "u32", "port".into());
    /// assert_eq!(key.display_name(), "u32");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::TypeNamed(_, name, _) => name,
        }
    }

    /// Get the binding name for named services, or None for unnamed services
    pub fn service_name(&self) -> Option<&str> {
        match self {
            Key::Type(_, _) => None,
            Key::TypeNamed(_, _, name) => Some(name),
        }
    }
}

// TypeId-only comparison; the type name is diagnostic
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::TypeNamed(a, _, name_a), Key::TypeNamed(b, _, name_b)) => {
                a == b && name_a == name_b
            }
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::TypeNamed(id, _, name) => {
                1u8.hash(state);
                id.hash(state);
                name.hash(state);
            }
        }
    }
}

#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

#[inline(always)]
pub fn key_of_named<T: 'static>(name: &str) -> Key {
    Key::TypeNamed(TypeId::of::<T>(), std::any::type_name::<T>(), Arc::from(name))
}
