//! Service and port metadata.
//!
//! Instead of discovering constructors and factory methods at runtime, each
//! service describes itself with a [`ServiceClass`] and each port type
//! implements [`WebServicePort`]. The resolver only ever looks at this
//! metadata: markers, endpoint names, parameter shapes and return types.

use std::any::TypeId;
use std::fmt;

mod binding;
mod class;
mod feature;

pub use binding::{AsAny, BindingProvider, RequestContext, ENDPOINT_ADDRESS_PROPERTY};
pub use class::{
    Constructor, ConstructorSignature, EndpointMethod, ParameterShape, Service, ServiceClass,
    ServiceClassBuilder,
};
pub use feature::{Features, WebServiceFeature};

/// Runtime identity of a Rust type, with its name kept for messages.
///
/// Two `TypeInfo`s are equal when their `TypeId`s are; the name never takes
/// part in comparisons.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Qualified XML name: a namespace URI plus a local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace_uri: String,
    pub local_part: String,
}

impl QName {
    pub fn new(namespace_uri: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            local_part: local_part.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_uri.is_empty() {
            f.write_str(&self.local_part)
        } else {
            write!(f, "{{{}}}{}", self.namespace_uri, self.local_part)
        }
    }
}

/// Marker identifying a type as a web service client (a proxy factory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebServiceClient {
    pub name: String,
    pub target_namespace: String,
    pub wsdl_location: Option<String>,
}

impl WebServiceClient {
    pub fn new(name: impl Into<String>, target_namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_namespace: target_namespace.into(),
            wsdl_location: None,
        }
    }

    pub fn wsdl_location(mut self, location: impl Into<String>) -> Self {
        self.wsdl_location = Some(location.into());
        self
    }

    pub fn service_name(&self) -> QName {
        QName::new(self.target_namespace.clone(), self.name.clone())
    }
}

/// Marker identifying a type as a service endpoint interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebService {
    pub name: String,
    pub target_namespace: String,
}

impl WebService {
    pub fn new(name: impl Into<String>, target_namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_namespace: target_namespace.into(),
        }
    }
}

/// A proxy type that endpoint methods can return.
///
/// Implementors describe their service endpoint interface marker.
/// Returning `None` from [`web_service`](WebServicePort::web_service) means
/// the type is not a service endpoint interface, and a
/// [`SeiProxyProvider`](crate::SeiProxyProvider) for it can't be built.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{BindingProvider, PortType, RequestContext, WebService, WebServicePort};
///
/// struct WeatherPort {
///     context: RequestContext,
/// }
///
/// impl BindingProvider for WeatherPort {
///     fn request_context(&self) -> &RequestContext {
///         &self.context
///     }
/// }
///
/// impl WebServicePort for WeatherPort {
///     fn web_service() -> Option<WebService> {
///         Some(WebService::new("WeatherPort", "http://example.com/weather"))
///     }
/// }
///
/// let port = PortType::of::<WeatherPort>();
/// assert!(port.is_web_service());
/// assert!(port.type_info().name().ends_with("WeatherPort"));
/// ```
pub trait WebServicePort: BindingProvider + Sized {
    fn web_service() -> Option<WebService>;
}

/// Declared type of a port: its identity plus its service marker.
#[derive(Debug, Clone)]
pub struct PortType {
    info: TypeInfo,
    web_service: Option<WebService>,
}

impl PortType {
    pub fn of<P: WebServicePort>() -> Self {
        Self {
            info: TypeInfo::of::<P>(),
            web_service: P::web_service(),
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        self.info
    }

    pub fn name(&self) -> &'static str {
        self.info.name()
    }

    pub fn web_service(&self) -> Option<&WebService> {
        self.web_service.as_ref()
    }

    pub fn is_web_service(&self) -> bool {
        self.web_service.is_some()
    }

    /// Whether a value declared as `other` can be handed out as `self`.
    ///
    /// Rust has no subtyping between port structs, so this is type identity.
    pub fn is_assignable_from(&self, other: &PortType) -> bool {
        self.info == other.info
    }
}

impl PartialEq for PortType {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl Eq for PortType {}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qname_display_uses_clark_notation() {
        assert_eq!(QName::new("http://example.com/weather", "Weather").to_string(), "{http://example.com/weather}Weather");
        assert_eq!(QName::new("", "Weather").to_string(), "Weather");
    }

    #[test]
    fn type_info_compares_by_identity() {
        assert_eq!(TypeInfo::of::<String>(), TypeInfo::of::<String>());
        assert_ne!(TypeInfo::of::<String>(), TypeInfo::of::<u32>());
    }

    #[test]
    fn client_marker_exposes_service_name() {
        let client = WebServiceClient::new("Weather", "http://example.com/weather")
            .wsdl_location("http://example.com/weather?wsdl");
        assert_eq!(client.service_name(), QName::new("http://example.com/weather", "Weather"));
        assert_eq!(client.wsdl_location.as_deref(), Some("http://example.com/weather?wsdl"));
    }
}
