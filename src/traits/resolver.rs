//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;
use crate::error::{DiError, DiResult};
use crate::key::{key_of_named, key_of_type, Key};

/// Core resolver trait for object-safe service resolution.
///
/// Most users should use the [`Resolver`] trait instead, which provides
/// typed generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// * `Ok(AnyArc)` - The resolved service wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Resolution error (not found, or the factory failed)
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Reports whether a binding exists for `key` without resolving it.
    fn contains(&self, key: &Key) -> bool;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// Both `ServiceProvider` and the `ResolverContext` handed to factories
/// implement this trait.
///
/// # Examples
///
/// ```
/// use ferrous_sei::{ServiceCollection, Resolver};
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
/// collection.add_named_singleton("demo.Weather.endpoint.name", "WeatherPort".to_string());
///
/// let provider = collection.build();
/// assert_eq!(*provider.get_required::<usize>(), 42);
/// assert_eq!(provider.get_named_required::<String>("demo.Weather.endpoint.name").as_str(), "WeatherPort");
/// assert!(provider.get_named_optional::<String>("demo.Weather.endpoint.url").unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&key_of_type::<T>())?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the service is not registered or its factory fails.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves a named concrete service type.
    fn get_named<T: 'static + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&key_of_named::<T>(name))?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a named concrete service type, panicking on failure.
    fn get_named_required<T: 'static + Send + Sync>(&self, name: &str) -> Arc<T> {
        self.get_named::<T>(name).unwrap_or_else(|e| {
            panic!("Failed to resolve named {} ({}): {}", std::any::type_name::<T>(), name, e)
        })
    }

    /// Resolves a named value only if a binding for it exists.
    ///
    /// An absent binding is `Ok(None)`, never an error. Errors raised while
    /// building a value that *is* bound are still reported.
    fn get_named_optional<T: 'static + Send + Sync>(&self, name: &str) -> DiResult<Option<Arc<T>>> {
        if !self.contains(&key_of_named::<T>(name)) {
            return Ok(None);
        }
        self.get_named::<T>(name).map(Some)
    }
}
