//! End-to-end proxy resolution through the container.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::*;
use ferrous_sei::{
    ConstructionCause, Constructor, DiError, EndpointMethod, Fault, Features, InvocationCause,
    Resolver, SeiProxyModule, SeiProxyProvider, ServiceClass, ServiceCollection,
    ServiceCollectionExt, ServiceCollectionModuleExt, WebServiceFeature, ENDPOINT_ADDRESS_PROPERTY,
};
use url::Url;

fn bind(services: &mut ServiceCollection, class: ServiceClass<Weather>) {
    services.add_module_mut(SeiProxyModule::new(class)).unwrap();
}

#[test]
fn default_proxy_keeps_its_address() {
    init_tracing();
    let provider = ServiceCollection::new()
        .add_module(SeiProxyModule::<Weather>::of())
        .unwrap()
        .build();

    let port = provider.get_required::<WeatherPort>();
    assert_eq!(port.built_with, "default");
    assert_eq!(port.context.endpoint_address().as_deref(), Some(DEFAULT_ADDRESS));
}

#[test]
fn endpoint_url_override_is_applied() {
    init_tracing();
    let mut services = ServiceCollection::new();
    services.add_named_singleton("demo.Weather.endpoint.url", "http://test/weather".to_string());
    bind(&mut services, weather_class().build());

    let port = services.build().get_required::<WeatherPort>();
    assert_eq!(port.context.get(ENDPOINT_ADDRESS_PROPERTY).as_deref(), Some("http://test/weather"));
}

#[test]
fn two_proxy_types_are_ambiguous() {
    let class = weather_class()
        .endpoint(EndpointMethod::new("ForecastPort", "get_forecast_port", Weather::get_forecast_port))
        .build();

    let err = ServiceCollection::new().add_module(SeiProxyModule::new(class)).err().unwrap();
    let message = err.to_string();
    assert!(matches!(err, DiError::AmbiguousProxyType { .. }));
    assert!(message.contains("WeatherPort"));
    assert!(message.contains("ForecastPort"));
}

#[test]
fn every_request_builds_a_new_service_and_proxy() {
    let provider = ServiceCollection::new()
        .add_module(SeiProxyModule::<Counted>::of())
        .unwrap()
        .build();

    let before = COUNTED_BUILDS.load(Ordering::SeqCst);
    let a = provider.get_required::<ForecastPort>();
    let b = provider.get_required::<ForecastPort>();
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(COUNTED_BUILDS.load(Ordering::SeqCst) >= before + 2);

    // The provider itself is shared.
    let p1 = provider.get_required::<SeiProxyProvider<Counted>>();
    let p2 = provider.get_required::<SeiProxyProvider<Counted>>();
    assert!(Arc::ptr_eq(&p1, &p2));
}

#[test]
fn wsdl_override_reaches_the_constructor() {
    let mut services = ServiceCollection::new();
    let wsdl = Url::parse("http://mirror/weather?wsdl").unwrap();
    services.add_named_singleton("demo.Weather.wsdl", wsdl.clone());
    bind(&mut services, full_weather_class().build());

    let provider = services.build();
    let port = provider.get_required::<WeatherPort>();
    assert_eq!(port.built_with, "wsdl");

    let service = provider.get_required::<SeiProxyProvider<Weather>>().service().unwrap();
    assert_eq!(service.wsdl, Some(wsdl));
}

#[test]
fn features_select_constructor_and_factory_method() {
    init_tracing();
    let mut services = ServiceCollection::new();
    let features = Features::new(vec![WebServiceFeature::enabled("mtom")]);
    services.add_named_singleton("demo.Weather", features.clone());
    bind(
        &mut services,
        full_weather_class()
            .endpoint(EndpointMethod::with_features("WeatherPort", "get_weather_port_with", Weather::get_weather_port_with))
            .build(),
    );

    let port = services.build().get_required::<WeatherPort>();
    assert_eq!(port.built_with, "features");
    assert_eq!(port.features, features.as_slice());
}

#[test]
fn only_default_constructor_still_succeeds_with_all_overrides() {
    let mut services = ServiceCollection::new();
    services.add_named_singleton("demo.Weather.wsdl", Url::parse("http://mirror/weather?wsdl").unwrap());
    services.add_named_singleton("demo.Weather", Features::new(vec![WebServiceFeature::enabled("mtom")]));
    bind(&mut services, weather_class().build());

    let port = services.build().get_required::<WeatherPort>();
    assert_eq!(port.built_with, "default");
}

#[test]
fn endpoint_name_filter_without_match_fails() {
    let mut services = ServiceCollection::new();
    services.add_named_singleton("demo.Weather.endpoint.name", "MissingPort".to_string());
    bind(&mut services, weather_class().build());

    let err = services.build().get::<WeatherPort>().err().unwrap();
    assert!(matches!(
        &err,
        DiError::NoMatchingOperation { endpoint_name: Some(name), .. } if name == "MissingPort"
    ));
    assert_eq!(
        err.to_string(),
        "No methods in demo.Weather annotated with @WebEndpoint(name = \"MissingPort\")"
    );
}

#[test]
fn endpoint_name_filter_picks_named_method() {
    let class = weather_class()
        .endpoint(EndpointMethod::new("WeatherPortV2", "get_weather_port_v2", |_: &Weather| {
            Ok(WeatherPort {
                context: ferrous_sei::RequestContext::with_endpoint_address("http://localhost:8080/v2"),
                features: Vec::new(),
                built_with: "v2",
            })
        }))
        .build();

    let mut services = ServiceCollection::new();
    services.add_named_singleton("demo.Weather.endpoint.name", "WeatherPortV2".to_string());
    bind(&mut services, class);

    let port = services.build().get_required::<WeatherPort>();
    assert_eq!(port.built_with, "v2");
}

#[test]
fn unmarked_factory_fails_on_first_request() {
    let class = ServiceClass::<Weather>::builder("demo.Plain")
        .constructor(Constructor::no_args(|| Ok(Weather { built_with: "default", wsdl: None })))
        .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port", Weather::get_weather_port))
        .build();

    let mut services = ServiceCollection::new();
    bind(&mut services, class);
    let err = services.build().get::<WeatherPort>().err().unwrap();
    assert_eq!(err.to_string(), "demo.Plain is not marked as a WebServiceClient");
}

#[test]
fn unmarked_port_fails_on_first_request() {
    let class = weather_class()
        .endpoint(EndpointMethod::new("Unmarked", "get_unmarked", |_: &Weather| {
            Ok(UnmarkedPort { context: ferrous_sei::RequestContext::new() })
        }))
        .build();
    // Two return types: binding fails before any marker check.
    assert!(SeiProxyModule::new(class).proxy_type().is_err());

    let class = ServiceClass::<Weather>::builder("demo.Weather")
        .client(weather_client())
        .constructor(Constructor::no_args(|| Ok(Weather { built_with: "default", wsdl: None })))
        .endpoint(EndpointMethod::new("Unmarked", "get_unmarked", |_: &Weather| {
            Ok(UnmarkedPort { context: ferrous_sei::RequestContext::new() })
        }))
        .build();
    let mut services = ServiceCollection::new();
    bind(&mut services, class);
    let err = services.build().get::<UnmarkedPort>().err().unwrap();
    assert!(matches!(err, DiError::InvalidProxyType { .. }));
}

#[test]
fn constructor_failure_surfaces_through_the_container() {
    let class = ServiceClass::<Weather>::builder("demo.Weather")
        .client(weather_client())
        .constructor(Constructor::no_args(|| Err(Fault::target("license expired"))))
        .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port", Weather::get_weather_port))
        .build();

    let mut services = ServiceCollection::new();
    bind(&mut services, class);
    let err = services.build().get::<WeatherPort>().err().unwrap();
    assert_eq!(err.construction_cause(), Some(ConstructionCause::ConstructorThrew));
    assert_eq!(
        err.to_string(),
        "Could not construct demo.Weather using demo.Weather(): constructor threw an error"
    );
    let source = std::error::Error::source(&err).map(|s| s.to_string());
    assert_eq!(source.as_deref(), Some("license expired"));
}

#[test]
fn factory_method_failure_surfaces_through_the_container() {
    let class = ServiceClass::<Weather>::builder("demo.Weather")
        .client(weather_client())
        .constructor(Constructor::no_args(|| Ok(Weather { built_with: "default", wsdl: None })))
        .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port", |_: &Weather| -> Result<WeatherPort, Fault> {
            Err(Fault::IllegalArgument("unknown region".into()))
        }))
        .build();

    let mut services = ServiceCollection::new();
    bind(&mut services, class);
    let err = services.build().get::<WeatherPort>().err().unwrap();
    assert_eq!(err.invocation_cause(), Some(InvocationCause::IllegalArgument));
    assert!(err.to_string().contains("get_weather_port()"));
    assert!(err.to_string().contains("demo.Weather"));
}
