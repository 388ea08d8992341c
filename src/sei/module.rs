//! Binding a service's port type at registration time.

use std::sync::Arc;

use tracing::debug;

use super::SeiProxyProvider;
use crate::collection::{ServiceCollection, ServiceModule};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::metadata::{PortType, Service, ServiceClass};
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Ctor};
use crate::traits::Resolver;

/// Module that binds the proxy type of one web service client.
///
/// The proxy type is the single type returned by the service's endpoint
/// methods. Registering the module adds two bindings:
///
/// * a singleton [`SeiProxyProvider<S>`], which reads its endpoint overrides
///   from the container the first time it is built;
/// * a transient binding for the proxy type, so every request gets a fresh
///   proxy from that provider.
///
/// Registering a second module for the same proxy type replaces the first
/// binding.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{
///     BindingProvider, Constructor, EndpointMethod, RequestContext, Resolver, SeiProxyModule,
///     Service, ServiceClass, ServiceCollection, ServiceCollectionExt, WebService,
///     WebServiceClient, WebServicePort,
/// };
///
/// struct WeatherPort { context: RequestContext }
///
/// impl BindingProvider for WeatherPort {
///     fn request_context(&self) -> &RequestContext { &self.context }
/// }
///
/// impl WebServicePort for WeatherPort {
///     fn web_service() -> Option<WebService> {
///         Some(WebService::new("WeatherPort", "http://example.com/weather"))
///     }
/// }
///
/// struct Weather;
///
/// impl Service for Weather {
///     fn service_class() -> ServiceClass<Self> {
///         ServiceClass::builder("demo.Weather")
///             .client(WebServiceClient::new("Weather", "http://example.com/weather"))
///             .constructor(Constructor::no_args(|| Ok(Weather)))
///             .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port", |_: &Weather| {
///                 Ok(WeatherPort { context: RequestContext::with_endpoint_address("http://localhost/weather") })
///             }))
///             .build()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_named_singleton("demo.Weather.endpoint.url", "http://test/weather".to_string());
/// let provider = services.add_module(SeiProxyModule::<Weather>::of()).unwrap().build();
///
/// let port = provider.get_required::<WeatherPort>();
/// assert_eq!(port.context.endpoint_address().as_deref(), Some("http://test/weather"));
/// ```
pub struct SeiProxyModule<S> {
    class: Arc<ServiceClass<S>>,
}

impl<S: Service> SeiProxyModule<S> {
    /// Binds the service described by `S::service_class()`.
    pub fn of() -> Self {
        Self::new(S::service_class())
    }
}

impl<S: Send + Sync + 'static> SeiProxyModule<S> {
    pub fn new(class: ServiceClass<S>) -> Self {
        Self { class: Arc::new(class) }
    }

    pub fn service_class(&self) -> &ServiceClass<S> {
        &self.class
    }

    /// Determines the proxy type from the endpoint methods' return types.
    ///
    /// Fails when there are no endpoint methods, or when they return more
    /// than one distinct type; the error lists every distinct type in
    /// declaration order.
    pub fn proxy_type(&self) -> DiResult<PortType> {
        let mut distinct: Vec<&PortType> = Vec::new();
        for method in self.class.endpoints() {
            debug!(
                "{} endpoint {:?}: {}",
                self.class.name(),
                method.endpoint_name(),
                method
            );
            let returns = method.return_type();
            if !distinct.contains(&returns) {
                distinct.push(returns);
            }
        }

        match distinct.as_slice() {
            [] => Err(DiError::NoEndpointOperations { service: self.class.name() }),
            [port] => Ok((*port).clone()),
            _ => Err(DiError::AmbiguousProxyType {
                service: self.class.name(),
                candidates: distinct.iter().map(|p| p.name()).collect(),
            }),
        }
    }
}

impl<S: Send + Sync + 'static> ServiceModule for SeiProxyModule<S> {
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
        let port = self.proxy_type()?;
        debug!("Binding {} to proxies from {}", port, self.class.name());

        let class = self.class.clone();
        let provider_port = port.clone();
        services.add_singleton_try_factory::<SeiProxyProvider<S>, _>(move |r| {
            SeiProxyProvider::new(class.clone(), provider_port.clone(), r)
        });

        let ctor: Ctor = Arc::new(|r: &ResolverContext| -> DiResult<AnyArc> {
            let provider = r.get::<SeiProxyProvider<S>>()?;
            let proxy = provider.get()?;
            Ok(Arc::from(proxy.into_any()))
        });
        let id = port.type_info().id();
        services.add_erased(Key::Type(id, port.name()), Lifetime::Transient, ctor, id);
        Ok(())
    }
}
