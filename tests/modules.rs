/// Tests for modular registration of proxy bindings and overrides
///
/// Proxy modules, override modules and hand-written modules all go through
/// the same ServiceModule trait, by value or in place.

mod common;

use common::*;
use ferrous_sei::{
    ConfigProvider, ConfigSource, ConfigValue, Constructor, DiError, DiResult, EndpointMethod, EndpointOverrides,
    RequestContext, Resolver, SeiProxyModule, ServiceClass, ServiceCollection, ServiceCollectionExt,
    ServiceCollectionModuleExt, ServiceModule,
};

// ===== Modules =====

struct TestEndpointModule {
    address: &'static str,
}

impl ServiceModule for TestEndpointModule {
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
        services.add_named_singleton("demo.Weather.endpoint.url", self.address.to_string());
        Ok(())
    }
}

#[derive(Debug)]
struct StaticSource(&'static str, &'static str);

impl ConfigSource for StaticSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        (key == self.0).then(|| ConfigValue::String(self.1.to_string()))
    }

    fn keys(&self) -> Vec<String> {
        vec![self.0.to_string()]
    }
}

// ===== Tests =====

#[test]
fn test_owned_self_module_chaining() {
    let provider = ServiceCollection::new()
        .add_module(TestEndpointModule { address: "http://chained/weather" })
        .unwrap()
        .add_module(SeiProxyModule::<Weather>::of())
        .unwrap()
        .build();

    let port = provider.get_required::<WeatherPort>();
    assert_eq!(port.context.endpoint_address().as_deref(), Some("http://chained/weather"));
}

#[test]
fn test_override_module_from_config_provider() {
    let mut config = ConfigProvider::new();
    config.add_source(Box::new(StaticSource("demo.Weather.endpoint.url", "http://configured/weather")));

    let mut services = ServiceCollection::new();
    services.add_module_mut(SeiProxyModule::<Weather>::of()).unwrap();
    services
        .add_module_mut(EndpointOverrides::load("demo.Weather", &config).unwrap())
        .unwrap();

    let port = services.build().get_required::<WeatherPort>();
    assert_eq!(port.context.endpoint_address().as_deref(), Some("http://configured/weather"));
}

#[test]
fn test_later_override_module_wins() {
    let mut services = ServiceCollection::new();
    services.add_module_mut(TestEndpointModule { address: "http://first/weather" }).unwrap();
    services.add_module_mut(TestEndpointModule { address: "http://second/weather" }).unwrap();
    services.add_module_mut(SeiProxyModule::<Weather>::of()).unwrap();

    let port = services.build().get_required::<WeatherPort>();
    assert_eq!(port.context.endpoint_address().as_deref(), Some("http://second/weather"));
}

#[test]
fn test_rebinding_same_port_replaces_binding() {
    let replacement = ServiceClass::<Weather>::builder("demo.Weather")
        .client(weather_client())
        .constructor(Constructor::no_args(|| Ok(Weather { built_with: "default", wsdl: None })))
        .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port_v2", |_: &Weather| {
            Ok(WeatherPort {
                context: RequestContext::with_endpoint_address("http://v2/weather"),
                features: Vec::new(),
                built_with: "v2",
            })
        }))
        .build();

    let mut services = ServiceCollection::new();
    services.add_module_mut(SeiProxyModule::<Weather>::of()).unwrap();
    let before = services.get_service_descriptors().len();
    services.add_module_mut(SeiProxyModule::new(replacement)).unwrap();
    assert_eq!(services.get_service_descriptors().len(), before);

    let port = services.build().get_required::<WeatherPort>();
    assert_eq!(port.built_with, "v2");
    assert_eq!(port.context.endpoint_address().as_deref(), Some("http://v2/weather"));
}

#[test]
fn test_failing_proxy_module_propagates() {
    let ambiguous = weather_class()
        .endpoint(EndpointMethod::new("ForecastPort", "get_forecast_port", Weather::get_forecast_port))
        .build();

    let mut services = ServiceCollection::new();
    services.add_module_mut(TestEndpointModule { address: "http://kept/weather" }).unwrap();
    let result = services.add_module_mut(SeiProxyModule::new(ambiguous));

    match result.err().unwrap() {
        DiError::AmbiguousProxyType { service, candidates } => {
            assert_eq!(service, "demo.Weather");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("Expected AmbiguousProxyType, got {other}"),
    }
    assert_eq!(services.get_service_descriptors().len(), 1);
}

#[test]
fn test_independent_services_bind_side_by_side() {
    let provider = ServiceCollection::new()
        .add_module(SeiProxyModule::<Weather>::of())
        .unwrap()
        .add_module(SeiProxyModule::<Counted>::of())
        .unwrap()
        .build();

    assert!(provider.get::<WeatherPort>().is_ok());
    assert!(provider.get::<ForecastPort>().is_ok());
}
