//! Transport features.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Opaque transport configuration token, passed to services and factory
/// methods unmodified.
///
/// Tokens parse from `id`, `id=true` or `id=false`.
///
/// ```rust
/// use ferrous_sei::WebServiceFeature;
///
/// let mtom: WebServiceFeature = "mtom".parse().unwrap();
/// assert!(mtom.enabled);
/// let addressing: WebServiceFeature = "addressing=false".parse().unwrap();
/// assert_eq!(addressing, WebServiceFeature::disabled("addressing"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WebServiceFeature {
    pub id: String,
    pub enabled: bool,
}

impl WebServiceFeature {
    pub fn enabled(id: impl Into<String>) -> Self {
        Self { id: id.into(), enabled: true }
    }

    pub fn disabled(id: impl Into<String>) -> Self {
        Self { id: id.into(), enabled: false }
    }
}

impl FromStr for WebServiceFeature {
    type Err = String;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let (id, enabled) = match token.split_once('=') {
            Some((id, flag)) => {
                let enabled = flag
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| format!("feature flag must be true or false: {token}"))?;
                (id.trim(), enabled)
            }
            None => (token, true),
        };
        if id.is_empty() {
            return Err(format!("empty feature id in {token:?}"));
        }
        Ok(Self { id: id.to_string(), enabled })
    }
}

impl fmt::Display for WebServiceFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.enabled)
    }
}

/// Ordered list of transport features bound for one service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features(Vec<WebServiceFeature>);

impl Features {
    pub fn new(features: Vec<WebServiceFeature>) -> Self {
        Self(features)
    }

    pub fn as_slice(&self) -> &[WebServiceFeature] {
        &self.0
    }
}

impl Deref for Features {
    type Target = [WebServiceFeature];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<WebServiceFeature>> for Features {
    fn from(features: Vec<WebServiceFeature>) -> Self {
        Self(features)
    }
}

impl FromIterator<WebServiceFeature> for Features {
    fn from_iter<I: IntoIterator<Item = WebServiceFeature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_tokens() {
        assert!("".parse::<WebServiceFeature>().is_err());
        assert!("=true".parse::<WebServiceFeature>().is_err());
        assert!("mtom=maybe".parse::<WebServiceFeature>().is_err());
    }

    #[test]
    fn keeps_declaration_order() {
        let features: Features = ["mtom", "addressing=false"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "mtom");
        assert!(!features[1].enabled);
    }
}
