//! Service class descriptions: constructors and endpoint methods.

use std::fmt;
use std::sync::Arc;

use url::Url;

use super::{BindingProvider, PortType, QName, WebServiceClient, WebServiceFeature, WebServicePort};
use crate::error::Fault;

type NoArgsCtor<S> = Arc<dyn Fn() -> Result<S, Fault> + Send + Sync>;
type WsdlCtor<S> = Arc<dyn Fn(&Url) -> Result<S, Fault> + Send + Sync>;
type FeaturesCtor<S> = Arc<dyn Fn(&[WebServiceFeature]) -> Result<S, Fault> + Send + Sync>;
type WsdlAndFeaturesCtor<S> = Arc<dyn Fn(&Url, &[WebServiceFeature]) -> Result<S, Fault> + Send + Sync>;

type NoArgsInvoker<S> = Arc<dyn Fn(&S) -> Result<Box<dyn BindingProvider>, Fault> + Send + Sync>;
type FeaturesInvoker<S> =
    Arc<dyn Fn(&S, &[WebServiceFeature]) -> Result<Box<dyn BindingProvider>, Fault> + Send + Sync>;

/// Self-description of a service type.
///
/// Implemented by generated or hand-written client factories so that
/// [`SeiProxyModule::of`](crate::SeiProxyModule::of) can bind them.
pub trait Service: Sized + Send + Sync + 'static {
    fn service_class() -> ServiceClass<Self>;
}

/// Constructor signatures a service may declare, from richest to poorest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructorSignature {
    WsdlAndFeatures,
    Wsdl,
    Features,
    Default,
}

impl ConstructorSignature {
    /// Priority order in which construction strategies are tried.
    pub const ORDER: [ConstructorSignature; 4] = [
        ConstructorSignature::WsdlAndFeatures,
        ConstructorSignature::Wsdl,
        ConstructorSignature::Features,
        ConstructorSignature::Default,
    ];

    /// Whether the overrides this signature consumes are all present.
    pub fn is_applicable(self, has_wsdl: bool, has_features: bool) -> bool {
        match self {
            ConstructorSignature::WsdlAndFeatures => has_wsdl && has_features,
            ConstructorSignature::Wsdl => has_wsdl,
            ConstructorSignature::Features => has_features,
            ConstructorSignature::Default => true,
        }
    }

    pub fn parameters(self) -> &'static str {
        match self {
            ConstructorSignature::WsdlAndFeatures => "(wsdl_location: Url, features: &[WebServiceFeature])",
            ConstructorSignature::Wsdl => "(wsdl_location: Url)",
            ConstructorSignature::Features => "(features: &[WebServiceFeature])",
            ConstructorSignature::Default => "()",
        }
    }
}

impl fmt::Display for ConstructorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parameters())
    }
}

enum ConstructorBody<S> {
    NoArgs(NoArgsCtor<S>),
    Wsdl(WsdlCtor<S>),
    Features(FeaturesCtor<S>),
    WsdlAndFeatures(WsdlAndFeaturesCtor<S>),
}

/// A constructor declared on a service.
pub struct Constructor<S> {
    body: ConstructorBody<S>,
}

impl<S> Constructor<S> {
    pub fn no_args<F>(f: F) -> Self
    where
        F: Fn() -> Result<S, Fault> + Send + Sync + 'static,
    {
        Self { body: ConstructorBody::NoArgs(Arc::new(f)) }
    }

    pub fn with_wsdl<F>(f: F) -> Self
    where
        F: Fn(&Url) -> Result<S, Fault> + Send + Sync + 'static,
    {
        Self { body: ConstructorBody::Wsdl(Arc::new(f)) }
    }

    pub fn with_features<F>(f: F) -> Self
    where
        F: Fn(&[WebServiceFeature]) -> Result<S, Fault> + Send + Sync + 'static,
    {
        Self { body: ConstructorBody::Features(Arc::new(f)) }
    }

    pub fn with_wsdl_and_features<F>(f: F) -> Self
    where
        F: Fn(&Url, &[WebServiceFeature]) -> Result<S, Fault> + Send + Sync + 'static,
    {
        Self { body: ConstructorBody::WsdlAndFeatures(Arc::new(f)) }
    }

    pub fn signature(&self) -> ConstructorSignature {
        match self.body {
            ConstructorBody::NoArgs(_) => ConstructorSignature::Default,
            ConstructorBody::Wsdl(_) => ConstructorSignature::Wsdl,
            ConstructorBody::Features(_) => ConstructorSignature::Features,
            ConstructorBody::WsdlAndFeatures(_) => ConstructorSignature::WsdlAndFeatures,
        }
    }

    /// Runs the constructor with whichever arguments its signature takes.
    pub fn invoke(&self, wsdl: Option<&Url>, features: Option<&[WebServiceFeature]>) -> Result<S, Fault> {
        let missing = |what: &str| Fault::IllegalArgument(format!("constructor {} requires {what}", self.signature()));
        match &self.body {
            ConstructorBody::NoArgs(f) => f(),
            ConstructorBody::Wsdl(f) => f(wsdl.ok_or_else(|| missing("a WSDL location"))?),
            ConstructorBody::Features(f) => f(features.ok_or_else(|| missing("features"))?),
            ConstructorBody::WsdlAndFeatures(f) => f(
                wsdl.ok_or_else(|| missing("a WSDL location"))?,
                features.ok_or_else(|| missing("features"))?,
            ),
        }
    }
}

/// Parameter shape of an endpoint method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterShape {
    /// Takes no arguments.
    None,
    /// Takes exactly a list of transport features.
    Features,
    /// Any other parameter list; never selected.
    Other(Vec<&'static str>),
}

impl fmt::Display for ParameterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterShape::None => f.write_str("()"),
            ParameterShape::Features => f.write_str("(features: &[WebServiceFeature])"),
            ParameterShape::Other(params) => write!(f, "({})", params.join(", ")),
        }
    }
}

enum Invoker<S> {
    NoArgs(NoArgsInvoker<S>),
    Features(FeaturesInvoker<S>),
    Unsupported,
}

/// An endpoint-producing method declared on a service.
pub struct EndpointMethod<S> {
    endpoint_name: String,
    method_name: &'static str,
    shape: ParameterShape,
    returns: PortType,
    invoker: Invoker<S>,
}

impl<S> EndpointMethod<S> {
    /// A method taking no arguments and returning a `P` proxy.
    pub fn new<P, F>(endpoint_name: impl Into<String>, method_name: &'static str, f: F) -> Self
    where
        P: WebServicePort,
        F: Fn(&S) -> Result<P, Fault> + Send + Sync + 'static,
    {
        let invoker: NoArgsInvoker<S> = Arc::new(move |service: &S| {
            let proxy: Box<dyn BindingProvider> = Box::new(f(service)?);
            Ok(proxy)
        });
        Self {
            endpoint_name: endpoint_name.into(),
            method_name,
            shape: ParameterShape::None,
            returns: PortType::of::<P>(),
            invoker: Invoker::NoArgs(invoker),
        }
    }

    /// A method taking transport features and returning a `P` proxy.
    pub fn with_features<P, F>(endpoint_name: impl Into<String>, method_name: &'static str, f: F) -> Self
    where
        P: WebServicePort,
        F: Fn(&S, &[WebServiceFeature]) -> Result<P, Fault> + Send + Sync + 'static,
    {
        let invoker: FeaturesInvoker<S> = Arc::new(move |service: &S, features: &[WebServiceFeature]| {
            let proxy: Box<dyn BindingProvider> = Box::new(f(service, features)?);
            Ok(proxy)
        });
        Self {
            endpoint_name: endpoint_name.into(),
            method_name,
            shape: ParameterShape::Features,
            returns: PortType::of::<P>(),
            invoker: Invoker::Features(invoker),
        }
    }

    /// A method with some other parameter list. It counts towards the
    /// service's proxy types but can never be chosen as a factory method.
    pub fn other<P: WebServicePort>(
        endpoint_name: impl Into<String>,
        method_name: &'static str,
        parameters: Vec<&'static str>,
    ) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            method_name,
            shape: ParameterShape::Other(parameters),
            returns: PortType::of::<P>(),
            invoker: Invoker::Unsupported,
        }
    }

    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }

    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    pub fn shape(&self) -> &ParameterShape {
        &self.shape
    }

    pub fn return_type(&self) -> &PortType {
        &self.returns
    }

    /// Calls the method, passing `features` when its shape takes them.
    pub fn invoke(&self, service: &S, features: Option<&[WebServiceFeature]>) -> Result<Box<dyn BindingProvider>, Fault> {
        match &self.invoker {
            Invoker::NoArgs(f) => f(service),
            Invoker::Features(f) => {
                let features = features
                    .ok_or_else(|| Fault::IllegalArgument(format!("{self} requires transport features")))?;
                f(service, features)
            }
            Invoker::Unsupported => Err(Fault::IllegalArgument(format!("{self} cannot be invoked"))),
        }
    }
}

impl<S> fmt::Display for EndpointMethod<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} -> {}", self.method_name, self.shape, self.returns)
    }
}

impl<S> fmt::Debug for EndpointMethod<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointMethod")
            .field("endpoint_name", &self.endpoint_name)
            .field("method_name", &self.method_name)
            .field("shape", &self.shape)
            .field("returns", &self.returns)
            .finish()
    }
}

/// Description of a service type: its marker, constructors and endpoint
/// methods, in declaration order.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{
///     BindingProvider, Constructor, EndpointMethod, RequestContext, ServiceClass,
///     WebService, WebServiceClient, WebServicePort,
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
/// assert_eq!(class.name(), "demo.Weather");
/// assert_eq!(class.endpoints().len(), 1);
/// assert_eq!(class.service_name().unwrap().local_part, "Weather");
/// ```
pub struct ServiceClass<S> {
    name: &'static str,
    client: Option<WebServiceClient>,
    is_abstract: bool,
    constructors: Vec<Constructor<S>>,
    endpoints: Vec<EndpointMethod<S>>,
}

impl<S> ServiceClass<S> {
    pub fn builder(name: &'static str) -> ServiceClassBuilder<S> {
        ServiceClassBuilder {
            class: ServiceClass {
                name,
                client: None,
                is_abstract: false,
                constructors: Vec::new(),
                endpoints: Vec::new(),
            },
        }
    }

    /// Stable name; configuration keys derive from it.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn client(&self) -> Option<&WebServiceClient> {
        self.client.as_ref()
    }

    pub fn is_web_service_client(&self) -> bool {
        self.client.is_some()
    }

    /// Namespace/name pair declared by the client marker.
    pub fn service_name(&self) -> Option<QName> {
        self.client.as_ref().map(WebServiceClient::service_name)
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn constructor(&self, signature: ConstructorSignature) -> Option<&Constructor<S>> {
        self.constructors.iter().find(|c| c.signature() == signature)
    }

    pub fn endpoints(&self) -> &[EndpointMethod<S>] {
        &self.endpoints
    }
}

impl<S> fmt::Debug for ServiceClass<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClass")
            .field("name", &self.name)
            .field("client", &self.client)
            .field("is_abstract", &self.is_abstract)
            .field("constructors", &self.constructors.iter().map(Constructor::signature).collect::<Vec<_>>())
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

/// Builder for [`ServiceClass`].
pub struct ServiceClassBuilder<S> {
    class: ServiceClass<S>,
}

impl<S> ServiceClassBuilder<S> {
    /// Marks the type as a web service client.
    pub fn client(mut self, client: WebServiceClient) -> Self {
        self.class.client = Some(client);
        self
    }

    /// Marks the type as not instantiable.
    pub fn abstract_class(mut self) -> Self {
        self.class.is_abstract = true;
        self
    }

    /// Declares a constructor; a second one with the same signature replaces
    /// the first.
    pub fn constructor(mut self, constructor: Constructor<S>) -> Self {
        let signature = constructor.signature();
        self.class.constructors.retain(|c| c.signature() != signature);
        self.class.constructors.push(constructor);
        self
    }

    pub fn endpoint(mut self, method: EndpointMethod<S>) -> Self {
        self.class.endpoints.push(method);
        self
    }

    pub fn build(self) -> ServiceClass<S> {
        self.class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{RequestContext, WebService};

    struct Port {
        ctx: RequestContext,
    }

    impl BindingProvider for Port {
        fn request_context(&self) -> &RequestContext {
            &self.ctx
        }
    }

    impl WebServicePort for Port {
        fn web_service() -> Option<WebService> {
            Some(WebService::new("Port", "urn:test"))
        }
    }

    struct Svc(u32);

    fn port() -> Port {
        Port { ctx: RequestContext::new() }
    }

    #[test]
    fn constructor_lookup_by_signature() {
        let class = ServiceClass::<Svc>::builder("test.Svc")
            .constructor(Constructor::no_args(|| Ok(Svc(0))))
            .constructor(Constructor::with_features(|f| Ok(Svc(f.len() as u32))))
            .build();

        assert!(class.constructor(ConstructorSignature::Default).is_some());
        assert!(class.constructor(ConstructorSignature::Wsdl).is_none());

        let features = [WebServiceFeature::enabled("mtom")];
        let built = class
            .constructor(ConstructorSignature::Features)
            .unwrap()
            .invoke(None, Some(&features))
            .unwrap();
        assert_eq!(built.0, 1);
    }

    #[test]
    fn constructor_missing_argument_is_illegal_argument() {
        let ctor = Constructor::<Svc>::with_wsdl(|_| Ok(Svc(1)));
        assert!(matches!(ctor.invoke(None, None), Err(Fault::IllegalArgument(_))));
    }

    #[test]
    fn endpoint_display_names_method_shape_and_return() {
        let method = EndpointMethod::<Svc>::with_features("Port", "get_port", |_, _| Ok(port()));
        let text = method.to_string();
        assert!(text.starts_with("get_port(features: &[WebServiceFeature]) -> "));
        assert!(text.ends_with("Port"));
    }

    #[test]
    fn features_method_without_features_is_illegal_argument() {
        let method = EndpointMethod::<Svc>::with_features("Port", "get_port", |_, _| Ok(port()));
        assert!(matches!(method.invoke(&Svc(0), None), Err(Fault::IllegalArgument(_))));
        assert!(method.invoke(&Svc(0), Some(&[])).is_ok());
    }

    #[test]
    fn other_shape_cannot_be_invoked() {
        let method = EndpointMethod::<Svc>::other::<Port>("Port", "get_port_for", vec!["QName"]);
        assert_eq!(method.shape(), &ParameterShape::Other(vec!["QName"]));
        assert!(method.invoke(&Svc(0), None).is_err());
    }
}
