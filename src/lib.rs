//! # ferrous-sei
//!
//! Dependency injection bindings for web service client proxies.
//!
//! A web service client is a factory type whose endpoint methods hand out
//! proxies for a remote service. `ferrous-sei` lets application code depend
//! on the proxy type alone: a [`SeiProxyModule`] finds the proxy type from the
//! factory's endpoint methods and binds it in a [`ServiceCollection`], and a
//! [`SeiProxyProvider`] builds a fresh proxy for every request.
//!
//! ## Features
//!
//! - **Binding-time checks**: a factory whose endpoint methods return no type,
//!   or several types, is rejected when the module is registered
//! - **Optional overrides**: WSDL location, transport features, endpoint name
//!   and endpoint address, bound as named values in the container
//! - **Constructor fallback**: the richest constructor the overrides allow is
//!   used, degrading with a warning when it is not declared
//! - **Structured errors**: every failure is a [`DiError`] naming the service
//!   or port involved, with the underlying [`Fault`] as its source
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_sei::{
//!     BindingProvider, Constructor, EndpointMethod, RequestContext, Resolver, SeiProxyModule,
//!     Service, ServiceClass, ServiceCollection, ServiceCollectionModuleExt, WebService,
//!     WebServiceClient, WebServicePort,
//! };
//!
//! // The proxy type application code depends on
//! struct WeatherPort {
//!     context: RequestContext,
//! }
//!
//! impl BindingProvider for WeatherPort {
//!     fn request_context(&self) -> &RequestContext {
//!         &self.context
//!     }
//! }
//!
//! impl WebServicePort for WeatherPort {
//!     fn web_service() -> Option<WebService> {
//!         Some(WebService::new("WeatherPort", "http://example.com/weather"))
//!     }
//! }
//!
//! // The client factory that produces it
//! struct Weather;
//!
//! impl Service for Weather {
//!     fn service_class() -> ServiceClass<Self> {
//!         ServiceClass::builder("demo.Weather")
//!             .client(WebServiceClient::new("Weather", "http://example.com/weather"))
//!             .constructor(Constructor::no_args(|| Ok(Weather)))
//!             .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port", |_: &Weather| {
//!                 Ok(WeatherPort {
//!                     context: RequestContext::with_endpoint_address("http://localhost:8080/weather"),
//!                 })
//!             }))
//!             .build()
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_module_mut(SeiProxyModule::<Weather>::of()).unwrap();
//! services.add_named_singleton("demo.Weather.endpoint.url", "http://test/weather".to_string());
//!
//! let provider = services.build();
//! let port = provider.get_required::<WeatherPort>();
//! assert_eq!(port.context.endpoint_address().as_deref(), Some("http://test/weather"));
//! ```
//!
//! ## Overrides
//!
//! For a factory named `demo.Weather` the provider looks up:
//!
//! | Name                          | Type       | Effect                                    |
//! |-------------------------------|------------|-------------------------------------------|
//! | `demo.Weather.wsdl`           | `Url`      | passed to a WSDL-taking constructor        |
//! | `demo.Weather`                | `Features` | passed to constructors and factory methods |
//! | `demo.Weather.endpoint.name`  | `String`   | restricts factory methods by endpoint name |
//! | `demo.Weather.endpoint.url`   | `String`   | replaces the proxy's endpoint address      |
//!
//! [`EndpointOverrides`] loads the same values from a [`ConfigProvider`].

pub mod collection;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod metadata;
pub mod provider;
pub mod sei;
pub mod traits;

mod registration;

pub use collection::{ServiceCollection, ServiceModule, ServiceCollectionExt, ServiceCollectionModuleExt};
pub use config::{ConfigProvider, ConfigSource, ConfigValue, EndpointOverrides, EnvironmentConfigSource};
#[cfg(feature = "config")]
pub use config::JsonConfigSource;
pub use descriptors::ServiceDescriptor;
pub use error::{BoxError, ConstructionCause, DiError, DiResult, Fault, InvocationCause};
pub use key::{Key, key_of_named, key_of_type};
pub use lifetime::Lifetime;
pub use metadata::{
    AsAny, BindingProvider, Constructor, ConstructorSignature, EndpointMethod, Features,
    ParameterShape, PortType, QName, RequestContext, Service, ServiceClass, ServiceClassBuilder,
    TypeInfo, WebService, WebServiceClient, WebServiceFeature, WebServicePort,
    ENDPOINT_ADDRESS_PROPERTY,
};
pub use provider::{ResolverContext, ServiceProvider};
pub use sei::{
    endpoint_name_property, endpoint_url_property, features_property, wsdl_location_property,
    ResolvedConfiguration, SeiProxyModule, SeiProxyProvider,
};
pub use traits::{Resolver, ResolverCore};
