//! Shared fixtures: a weather client and two port types.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use ferrous_sei::{
    BindingProvider, Constructor, EndpointMethod, Fault, RequestContext, Service, ServiceClass,
    ServiceClassBuilder, WebService, WebServiceClient, WebServiceFeature, WebServicePort,
};
use url::Url;

pub const DEFAULT_ADDRESS: &str = "http://localhost:8080/weather";

static INIT: Once = Once::new();

/// Routes library logs to the test harness output.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug)]
pub struct WeatherPort {
    pub context: RequestContext,
    pub features: Vec<WebServiceFeature>,
    pub built_with: &'static str,
}

impl BindingProvider for WeatherPort {
    fn request_context(&self) -> &RequestContext {
        &self.context
    }
}

impl WebServicePort for WeatherPort {
    fn web_service() -> Option<WebService> {
        Some(WebService::new("WeatherPort", "http://example.com/weather"))
    }
}

#[derive(Debug)]
pub struct ForecastPort {
    pub context: RequestContext,
}

impl BindingProvider for ForecastPort {
    fn request_context(&self) -> &RequestContext {
        &self.context
    }
}

impl WebServicePort for ForecastPort {
    fn web_service() -> Option<WebService> {
        Some(WebService::new("ForecastPort", "http://example.com/weather"))
    }
}

/// A port type without the service endpoint marker.
pub struct UnmarkedPort {
    pub context: RequestContext,
}

impl BindingProvider for UnmarkedPort {
    fn request_context(&self) -> &RequestContext {
        &self.context
    }
}

impl WebServicePort for UnmarkedPort {
    fn web_service() -> Option<WebService> {
        None
    }
}

/// The client factory; records which constructor built it.
pub struct Weather {
    pub built_with: &'static str,
    pub wsdl: Option<Url>,
}

impl Weather {
    pub fn get_weather_port(&self) -> Result<WeatherPort, Fault> {
        Ok(WeatherPort {
            context: RequestContext::with_endpoint_address(DEFAULT_ADDRESS),
            features: Vec::new(),
            built_with: self.built_with,
        })
    }

    pub fn get_weather_port_with(&self, features: &[WebServiceFeature]) -> Result<WeatherPort, Fault> {
        Ok(WeatherPort {
            context: RequestContext::with_endpoint_address(DEFAULT_ADDRESS),
            features: features.to_vec(),
            built_with: self.built_with,
        })
    }

    pub fn get_forecast_port(&self) -> Result<ForecastPort, Fault> {
        Ok(ForecastPort {
            context: RequestContext::with_endpoint_address("http://localhost:8080/forecast"),
        })
    }
}

impl Service for Weather {
    fn service_class() -> ServiceClass<Self> {
        weather_class().build()
    }
}

pub fn weather_client() -> WebServiceClient {
    WebServiceClient::new("Weather", "http://example.com/weather")
        .wsdl_location("http://example.com/weather?wsdl")
}

/// The weather factory with only a no-argument constructor and one
/// endpoint method.
pub fn weather_class() -> ServiceClassBuilder<Weather> {
    ServiceClass::builder("demo.Weather")
        .client(weather_client())
        .constructor(Constructor::no_args(|| Ok(Weather { built_with: "default", wsdl: None })))
        .endpoint(EndpointMethod::new("WeatherPort", "get_weather_port", Weather::get_weather_port))
}

/// A weather factory declaring every constructor signature.
pub fn full_weather_class() -> ServiceClassBuilder<Weather> {
    weather_class()
        .constructor(Constructor::with_wsdl(|wsdl| {
            Ok(Weather { built_with: "wsdl", wsdl: Some(wsdl.clone()) })
        }))
        .constructor(Constructor::with_features(|_| Ok(Weather { built_with: "features", wsdl: None })))
        .constructor(Constructor::with_wsdl_and_features(|wsdl, _| {
            Ok(Weather { built_with: "wsdl+features", wsdl: Some(wsdl.clone()) })
        }))
}

/// Counts constructions, for checking that every request builds anew.
pub struct Counted;

pub static COUNTED_BUILDS: AtomicUsize = AtomicUsize::new(0);

impl Service for Counted {
    fn service_class() -> ServiceClass<Self> {
        ServiceClass::builder("demo.Counted")
            .client(WebServiceClient::new("Counted", "http://example.com/counted"))
            .constructor(Constructor::no_args(|| {
                COUNTED_BUILDS.fetch_add(1, Ordering::SeqCst);
                Ok(Counted)
            }))
            .endpoint(EndpointMethod::new("ForecastPort", "get_forecast_port", |_: &Counted| {
                Ok(ForecastPort { context: RequestContext::new() })
            }))
            .build()
    }
}
