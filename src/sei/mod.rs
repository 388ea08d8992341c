//! Proxy bindings for web service clients.
//!
//! [`SeiProxyModule`] inspects a [`ServiceClass`](crate::ServiceClass) once at
//! registration time and binds its port type. Every request for that port
//! goes through a [`SeiProxyProvider`], which builds the service, picks the
//! factory method and applies endpoint overrides.

mod module;
mod provider;

pub use module::SeiProxyModule;
pub use provider::{
    endpoint_name_property, endpoint_url_property, features_property, wsdl_location_property,
    ResolvedConfiguration, SeiProxyProvider,
};
