//! Endpoint overrides from external configuration.
//!
//! A [`ConfigProvider`] reads values from prioritized sources (environment
//! variables, and JSON files with the `config` feature). [`EndpointOverrides`]
//! turns the values for one service into the named bindings a
//! [`SeiProxyProvider`](crate::SeiProxyProvider) looks up.

use std::borrow::Cow;
use std::collections::HashMap;
use std::env;

use parking_lot::RwLock;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::collection::{ServiceCollection, ServiceModule};
use crate::metadata::{Features, WebServiceFeature};
use crate::sei::{
    endpoint_name_property, endpoint_url_property, features_property, wsdl_location_property,
    ResolvedConfiguration,
};
use crate::{DiError, DiResult};

/// A configuration value that can be various types
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<ConfigValue>),
    Object(HashMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Try to convert to string
    pub fn as_string(&self) -> DiResult<&str> {
        match self {
            ConfigValue::String(s) => Ok(s),
            _ => Err(DiError::TypeMismatch("Config value is not a string")),
        }
    }

    /// Renders a scalar back to its text form.
    ///
    /// Sources such as the environment coerce `2024` or `true` to numbers and
    /// booleans; every endpoint override is text, so those read back as the
    /// original token. Floats, arrays and objects have no text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ConfigValue::String(s) => Some(Cow::Borrowed(s.as_str())),
            ConfigValue::Integer(i) => Some(Cow::Owned(i.to_string())),
            ConfigValue::Boolean(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }
}

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Get a configuration value by key
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// List all available keys
    fn keys(&self) -> Vec<String>;
}

/// Environment variable configuration source.
///
/// A key maps to an upper-case variable name with dots replaced by
/// underscores, so `demo.Weather.endpoint.url` is read from
/// `DEMO_WEATHER_ENDPOINT_URL` (or `APP_DEMO_WEATHER_ENDPOINT_URL` with the
/// prefix `app`).
#[derive(Debug, Default)]
pub struct EnvironmentConfigSource {
    /// Prefix to filter environment variables
    prefix: Option<String>,
}

impl EnvironmentConfigSource {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }

    fn variable_name(&self, key: &str) -> String {
        let key = key.replace('.', "_").to_uppercase();
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_uppercase(), key),
            None => key,
        }
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        env::var(self.variable_name(key)).ok().map(|value| {
            if let Ok(int_val) = value.parse::<i64>() {
                ConfigValue::Integer(int_val)
            } else if let Ok(bool_val) = value.parse::<bool>() {
                ConfigValue::Boolean(bool_val)
            } else {
                ConfigValue::String(value)
            }
        })
    }

    fn keys(&self) -> Vec<String> {
        let prefix = self.prefix.as_ref().map(|p| format!("{}_", p.to_uppercase()));
        env::vars()
            .filter_map(|(key, _)| match &prefix {
                Some(prefix) => key.strip_prefix(prefix.as_str()).map(str::to_lowercase),
                None => Some(key.to_lowercase()),
            })
            .collect()
    }
}

/// JSON file configuration source.
///
/// The file holds one flat object keyed by full property name:
///
/// ```json
/// {
///   "demo.Weather.endpoint.url": "http://test/weather",
///   "demo.Weather": ["mtom", "addressing=false"]
/// }
/// ```
#[cfg(feature = "config")]
#[derive(Debug)]
pub struct JsonConfigSource {
    /// File path to JSON configuration
    file_path: String,
    /// Cached parsed configuration
    config: RwLock<Option<HashMap<String, ConfigValue>>>,
}

#[cfg(feature = "config")]
impl JsonConfigSource {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            config: RwLock::new(None),
        }
    }

    /// Reload configuration from file
    pub fn reload(&self) -> DiResult<()> {
        let content = std::fs::read_to_string(&self.file_path).map_err(|e| DiError::Config {
            key: self.file_path.clone(),
            reason: e.to_string(),
        })?;

        let parsed: HashMap<String, ConfigValue> =
            serde_json::from_str(&content).map_err(|e| DiError::Config {
                key: self.file_path.clone(),
                reason: e.to_string(),
            })?;

        *self.config.write() = Some(parsed);
        Ok(())
    }
}

#[cfg(feature = "config")]
impl ConfigSource for JsonConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        if self.config.read().is_none() {
            if let Err(e) = self.reload() {
                debug!("Skipping configuration file: {}", e);
                return None;
            }
        }

        self.config.read().as_ref()?.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.config
            .read()
            .as_ref()
            .map(|cfg| cfg.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Configuration provider checking sources in priority order.
pub struct ConfigProvider {
    /// Configuration sources in priority order
    sources: Vec<Box<dyn ConfigSource>>,
    /// Cached configuration values
    cache: RwLock<HashMap<String, ConfigValue>>,
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("sources", &self.sources)
            .field("cache", &*self.cache.read())
            .finish()
    }
}

impl ConfigProvider {
    /// Create a configuration provider with no sources
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Add a configuration source (higher priority sources should be added first)
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Get a configuration value, checking sources in priority order
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        if let Some(value) = self.cache.read().get(key) {
            return Some(value.clone());
        }

        let value = self.sources.iter().find_map(|source| source.get(key))?;
        self.cache.write().insert(key.to_string(), value.clone());
        Some(value)
    }

    /// Get a string configuration value
    pub fn get_string(&self, key: &str) -> DiResult<String> {
        self.get(key)
            .ok_or(DiError::NotFound("Configuration key not found"))?
            .as_string()
            .map(|s| s.to_string())
    }

    /// Get a string configuration value with default
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get all configuration keys from all sources
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sources.iter().flat_map(|s| s.keys()).collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        let mut provider = Self::new();
        provider.add_source(Box::new(EnvironmentConfigSource::new()));
        provider
    }
}

/// Endpoint overrides for one service, read from a [`ConfigProvider`].
///
/// Registering it as a module binds each value that was found under the
/// name the proxy provider looks up. Register it before the first proxy is
/// resolved; the provider reads its overrides once.
///
/// # Examples
///
/// ```rust
/// use ferrous_sei::{ConfigProvider, ConfigSource, ConfigValue, EndpointOverrides};
///
/// #[derive(Debug)]
/// struct Fixed;
///
/// impl ConfigSource for Fixed {
///     fn get(&self, key: &str) -> Option<ConfigValue> {
///         match key {
///             "demo.Weather.endpoint.url" => Some(ConfigValue::String("http://test/weather".into())),
///             "demo.Weather" => Some(ConfigValue::String("mtom, addressing=false".into())),
///             _ => None,
///         }
///     }
///     fn keys(&self) -> Vec<String> { Vec::new() }
/// }
///
/// let mut config = ConfigProvider::new();
/// config.add_source(Box::new(Fixed));
///
/// let overrides = EndpointOverrides::load("demo.Weather", &config).unwrap();
/// let resolved = overrides.configuration();
/// assert_eq!(resolved.endpoint_address.as_deref(), Some("http://test/weather"));
/// assert_eq!(resolved.features.as_ref().map(|f| f.len()), Some(2));
/// assert!(resolved.wsdl_location.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointOverrides {
    service: String,
    config: ResolvedConfiguration,
}

impl EndpointOverrides {
    /// Reads the overrides for `service`.
    ///
    /// Features may be an array of tokens or one comma-separated string.
    pub fn load(service: &str, config: &ConfigProvider) -> DiResult<Self> {
        let wsdl_key = wsdl_location_property(service);
        let wsdl_location = match config.get(&wsdl_key) {
            Some(value) => {
                let text = text_value(&wsdl_key, &value)?;
                let url = Url::parse(&text).map_err(|e| DiError::Config {
                    key: wsdl_key.clone(),
                    reason: e.to_string(),
                })?;
                Some(url)
            }
            None => None,
        };

        let features_key = features_property(service);
        let features = config
            .get(&features_key)
            .map(|value| parse_features(&features_key, &value))
            .transpose()?;

        let name_key = endpoint_name_property(service);
        let endpoint_name = config
            .get(&name_key)
            .map(|value| text_value(&name_key, &value))
            .transpose()?;

        let url_key = endpoint_url_property(service);
        let endpoint_address = config
            .get(&url_key)
            .map(|value| text_value(&url_key, &value))
            .transpose()?;

        debug!(
            "Loaded endpoint overrides for {}: wsdl={:?} features={:?} name={:?} url={:?}",
            service,
            wsdl_location.as_ref().map(Url::as_str),
            features.as_ref().map(|f: &Features| f.len()),
            endpoint_name,
            endpoint_address
        );

        Ok(Self {
            service: service.to_string(),
            config: ResolvedConfiguration {
                wsdl_location,
                features,
                endpoint_name,
                endpoint_address,
            },
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn configuration(&self) -> &ResolvedConfiguration {
        &self.config
    }
}

impl ServiceModule for EndpointOverrides {
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
        let ResolvedConfiguration {
            wsdl_location,
            features,
            endpoint_name,
            endpoint_address,
        } = self.config;

        if let Some(url) = wsdl_location {
            services.add_named_singleton(&wsdl_location_property(&self.service), url);
        }
        if let Some(features) = features {
            services.add_named_singleton(&features_property(&self.service), features);
        }
        if let Some(name) = endpoint_name {
            services.add_named_singleton(&endpoint_name_property(&self.service), name);
        }
        if let Some(address) = endpoint_address {
            services.add_named_singleton(&endpoint_url_property(&self.service), address);
        }
        Ok(())
    }
}

fn text_value(key: &str, value: &ConfigValue) -> DiResult<String> {
    value.as_text().map(Cow::into_owned).ok_or_else(|| DiError::Config {
        key: key.to_string(),
        reason: format!("expected a string, found {value:?}"),
    })
}

fn parse_features(key: &str, value: &ConfigValue) -> DiResult<Features> {
    let invalid = |reason: String| DiError::Config { key: key.to_string(), reason };
    let tokens: Vec<Cow<'_, str>> = match value {
        ConfigValue::Array(items) => items
            .iter()
            .map(|item| item.as_text().ok_or_else(|| invalid(format!("feature must be a string, found {item:?}"))))
            .collect::<DiResult<_>>()?,
        scalar => match scalar.as_text() {
            Some(Cow::Borrowed(list)) => list
                .split(',')
                .filter(|t| !t.trim().is_empty())
                .map(Cow::Borrowed)
                .collect(),
            Some(token) => vec![token],
            None => return Err(invalid(format!("expected a feature list, found {scalar:?}"))),
        },
    };

    tokens
        .iter()
        .map(|token| token.parse::<WebServiceFeature>().map_err(invalid))
        .collect()
}
