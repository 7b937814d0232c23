//! Endpoint resolution: operation + region → base URL.

use url::Url;

use crate::descriptor::OperationDescriptor;
use crate::error::ConfigError;

/// Maps an operation and region to the base URL requests are sent to.
///
/// The marshaled path is appended to the returned URL.
pub trait EndpointResolver: std::fmt::Debug + Send + Sync {
    /// ## Errors
    ///
    /// Returns a [`ConfigError`] when no valid URL can be produced.
    fn resolve(&self, descriptor: &OperationDescriptor, region: &str) -> Result<Url, ConfigError>;
}

/// Sends every operation to one fixed base URL.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::resolver::StaticEndpoint;
///
/// let endpoint = StaticEndpoint::parse("http://localhost:8080").unwrap();
/// assert_eq!(endpoint.url().as_str(), "http://localhost:8080/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEndpoint(Url);

impl StaticEndpoint {
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `url` does not parse.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        Ok(Self(Url::parse(url)?))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl EndpointResolver for StaticEndpoint {
    fn resolve(&self, _descriptor: &OperationDescriptor, _region: &str) -> Result<Url, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Builds `{scheme}://{service}.{region}.{domain}/` per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalEndpoint {
    domain: String,
    scheme: String,
}

impl RegionalEndpoint {
    /// An HTTPS resolver under `domain` (e.g. `ml.example.com`).
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            scheme: "https".to_string(),
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }
}

impl EndpointResolver for RegionalEndpoint {
    fn resolve(&self, descriptor: &OperationDescriptor, region: &str) -> Result<Url, ConfigError> {
        if region.is_empty() {
            return Err(ConfigError::missing_field("region"));
        }
        let url = format!(
            "{}://{}.{}.{}/",
            self.scheme,
            descriptor.service(),
            region,
            self.domain
        );
        Ok(Url::parse(&url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Member;
    use crate::method::RestMethod;

    fn describe() -> OperationDescriptor {
        OperationDescriptor::builder()
            .id("DescribeTrainingJob")
            .method(RestMethod::Get)
            .uri("/training-jobs/{trainingJobName}")
            .service("training")
            .member(Member::path("trainingJobName"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_static_endpoint_ignores_region() {
        let endpoint = StaticEndpoint::parse("http://127.0.0.1:9000").unwrap();
        let url = endpoint.resolve(&describe(), "eu-west-1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_static_endpoint_rejects_garbage() {
        assert!(matches!(
            StaticEndpoint::parse("not a url"),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_regional_endpoint() {
        let resolver = RegionalEndpoint::new("ml.example.com");
        let url = resolver.resolve(&describe(), "us-east-1").unwrap();
        assert_eq!(url.as_str(), "https://training.us-east-1.ml.example.com/");

        let url = resolver
            .with_scheme("http")
            .resolve(&describe(), "eu-west-1")
            .unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_regional_endpoint_requires_region() {
        let err = RegionalEndpoint::new("ml.example.com")
            .resolve(&describe(), "")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "region" }));
    }
}
