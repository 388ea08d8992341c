//! Per-request proxy creation.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ConstructionCause, DiError, DiResult, Fault, InvocationCause};
use crate::metadata::{
    BindingProvider, Constructor, ConstructorSignature, EndpointMethod, Features, ParameterShape,
    PortType, ServiceClass, WebServicePort, ENDPOINT_ADDRESS_PROPERTY,
};
use crate::traits::Resolver;

/// Name of the `Url` binding holding a service's WSDL location.
pub fn wsdl_location_property(service: &str) -> String {
    format!("{service}.wsdl")
}

/// Name of the `Features` binding holding a service's transport features.
pub fn features_property(service: &str) -> String {
    service.to_string()
}

/// Name of the `String` binding selecting an endpoint by its declared name.
pub fn endpoint_name_property(service: &str) -> String {
    format!("{service}.endpoint.name")
}

/// Name of the `String` binding overriding the endpoint address.
pub fn endpoint_url_property(service: &str) -> String {
    format!("{service}.endpoint.url")
}

/// Optional overrides for one service, read once and never changed.
///
/// Every field is independent; `None` means the framework default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    pub wsdl_location: Option<Url>,
    pub features: Option<Features>,
    pub endpoint_name: Option<String>,
    pub endpoint_address: Option<String>,
}

impl ResolvedConfiguration {
    /// Reads the overrides bound for `service` from `resolver`.
    ///
    /// A missing binding leaves the field `None`.
    pub fn resolve<R: Resolver>(service: &str, resolver: &R) -> DiResult<Self> {
        let wsdl_location = resolver
            .get_named_optional::<Url>(&wsdl_location_property(service))?
            .map(|url| (*url).clone());
        let features = resolver
            .get_named_optional::<Features>(&features_property(service))?
            .map(|features| (*features).clone());
        let endpoint_name = resolver
            .get_named_optional::<String>(&endpoint_name_property(service))?
            .map(|name| (*name).clone());
        let endpoint_address = resolver
            .get_named_optional::<String>(&endpoint_url_property(service))?
            .map(|address| (*address).clone());

        Ok(Self {
            wsdl_location,
            features,
            endpoint_name,
            endpoint_address,
        })
    }
}

/// Builds `port` proxies from a service on every request.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use ferrous_sei::{
///     BindingProvider, Constructor, EndpointMethod, PortType, RequestContext,
///     ResolvedConfiguration, SeiProxyProvider, ServiceClass, WebService,
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
/// let class = ServiceClass::<Weather>::builder("demo.Weather")
///     .client(WebServiceClient::new("Weather", "http://example.com/weather"))
///     .constructor(Constructor::no_args(|| Ok(Weather)))
///     .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port", |_: &Weather| {
///         Ok(WeatherPort { context: RequestContext::with_endpoint_address("http://localhost/weather") })
///     }))
///     .build();
///
/// let config = ResolvedConfiguration {
///     endpoint_address: Some("http://test/weather".to_string()),
///     ..Default::default()
/// };
/// let provider = SeiProxyProvider::with_configuration(Arc::new(class), PortType::of::<WeatherPort>(), config).unwrap();
/// let port = provider.get_as::<WeatherPort>().unwrap();
/// assert_eq!(port.context.endpoint_address().as_deref(), Some("http://test/weather"));
/// ```
pub struct SeiProxyProvider<S> {
    class: Arc<ServiceClass<S>>,
    port: PortType,
    config: ResolvedConfiguration,
}

impl<S: Send + Sync + 'static> SeiProxyProvider<S> {
    /// Checks the markers and reads the overrides bound in `resolver`.
    pub fn new<R: Resolver>(class: Arc<ServiceClass<S>>, port: PortType, resolver: &R) -> DiResult<Self> {
        Self::check_markers(&class, &port)?;
        let config = ResolvedConfiguration::resolve(class.name(), resolver)?;
        Ok(Self { class, port, config })
    }

    /// Checks the markers and uses an explicit configuration.
    pub fn with_configuration(class: Arc<ServiceClass<S>>, port: PortType, config: ResolvedConfiguration) -> DiResult<Self> {
        Self::check_markers(&class, &port)?;
        Ok(Self { class, port, config })
    }

    fn check_markers(class: &ServiceClass<S>, port: &PortType) -> DiResult<()> {
        if !class.is_web_service_client() {
            return Err(DiError::InvalidFactoryType { service: class.name() });
        }
        if !port.is_web_service() {
            return Err(DiError::InvalidProxyType { port: port.name() });
        }
        Ok(())
    }

    pub fn configuration(&self) -> &ResolvedConfiguration {
        &self.config
    }

    pub fn port_type(&self) -> &PortType {
        &self.port
    }

    /// Builds a proxy: constructs the service, invokes the selected factory
    /// method, then applies the endpoint address override.
    pub fn get(&self) -> DiResult<Box<dyn BindingProvider>> {
        let service = self.service()?;
        let method = self.factory_method()?;

        let proxy = method
            .invoke(&service, self.config.features.as_deref())
            .map_err(|fault| {
                let cause = match fault {
                    Fault::IllegalAccess(_) => InvocationCause::AccessDenied,
                    Fault::IllegalArgument(_) => InvocationCause::IllegalArgument,
                    Fault::Target(_) => InvocationCause::TargetThrew,
                };
                DiError::InvocationFailed {
                    service: self.class.name(),
                    operation: method.to_string(),
                    cause,
                    source: fault,
                }
            })?;

        let ctx = proxy.request_context();
        match &self.config.endpoint_address {
            Some(address) => {
                info!("{} endpoint URL set to {}", self.port, address);
                ctx.insert(ENDPOINT_ADDRESS_PROPERTY, address.clone());
            }
            None => {
                let default = ctx.endpoint_address();
                info!(
                    "No endpoint URL defined for {}. Using default: {}",
                    self.port,
                    default.as_deref().unwrap_or("<none>")
                );
            }
        }

        Ok(proxy)
    }

    /// Like [`get`](Self::get), downcast to the concrete port type.
    pub fn get_as<P: WebServicePort>(&self) -> DiResult<Box<P>> {
        self.get()?
            .into_any()
            .downcast::<P>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<P>()))
    }

    /// Constructs a fresh service instance with the richest constructor the
    /// overrides allow.
    ///
    /// Strategies are tried in [`ConstructorSignature::ORDER`]; one whose
    /// overrides are missing is skipped, one the service does not declare is
    /// skipped with a warning. The no-argument constructor ends the chain.
    pub fn service(&self) -> DiResult<S> {
        let has_wsdl = self.config.wsdl_location.is_some();
        let has_features = self.config.features.is_some();

        let richer = ConstructorSignature::ORDER
            .into_iter()
            .filter(|s| *s != ConstructorSignature::Default && s.is_applicable(has_wsdl, has_features));
        for signature in richer {
            match self.class.constructor(signature) {
                Some(constructor) => return self.instantiate(constructor),
                None => warn!(
                    "No {}{} constructor. Trying the next constructor.",
                    self.class.name(),
                    signature
                ),
            }
        }

        match self.class.constructor(ConstructorSignature::Default) {
            Some(constructor) => self.instantiate(constructor),
            None => Err(DiError::ConstructionFailed {
                service: self.class.name(),
                signature: format!("{}{}", self.class.name(), ConstructorSignature::Default),
                cause: ConstructionCause::NoDefaultConstructor,
                source: None,
            }),
        }
    }

    fn instantiate(&self, constructor: &Constructor<S>) -> DiResult<S> {
        let signature = format!("{}{}", self.class.name(), constructor.signature());
        if self.class.is_abstract() {
            return Err(DiError::ConstructionFailed {
                service: self.class.name(),
                signature,
                cause: ConstructionCause::AbstractType,
                source: None,
            });
        }

        debug!("Constructing {} using {}", self.class.name(), constructor.signature());
        constructor
            .invoke(self.config.wsdl_location.as_ref(), self.config.features.as_deref())
            .map_err(|fault| {
                let cause = match fault {
                    Fault::IllegalAccess(_) => ConstructionCause::AccessDenied,
                    Fault::IllegalArgument(_) => ConstructionCause::IllegalArgument,
                    Fault::Target(_) => ConstructionCause::ConstructorThrew,
                };
                DiError::ConstructionFailed {
                    service: self.class.name(),
                    signature,
                    cause,
                    source: Some(fault),
                }
            })
    }

    /// Selects the endpoint method that will produce proxies.
    ///
    /// Candidates are narrowed to the configured endpoint name, if any. With
    /// features configured the first features-taking method wins; otherwise,
    /// or if there is none, the first no-argument method.
    pub fn factory_method(&self) -> DiResult<&EndpointMethod<S>> {
        let candidates: Vec<&EndpointMethod<S>> = self
            .class
            .endpoints()
            .iter()
            .filter(|m| match &self.config.endpoint_name {
                Some(name) => m.endpoint_name() == name,
                None => true,
            })
            .collect();

        if candidates.is_empty() {
            return Err(DiError::NoMatchingOperation {
                service: self.class.name(),
                endpoint_name: self.config.endpoint_name.clone(),
            });
        }

        let with_features = if self.config.features.is_some() {
            candidates.iter().find(|m| *m.shape() == ParameterShape::Features)
        } else {
            None
        };
        let method = with_features
            .or_else(|| candidates.iter().find(|m| *m.shape() == ParameterShape::None))
            .copied()
            .ok_or(DiError::NoViableOperation { service: self.class.name() })?;

        if !self.port.is_assignable_from(method.return_type()) {
            return Err(DiError::ReturnTypeMismatch {
                service: self.class.name(),
                operation: method.to_string(),
                port: self.port.name(),
            });
        }

        debug!("proxy factory method: {}", method);
        Ok(method)
    }
}
