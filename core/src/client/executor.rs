//! Request execution with tracing instrumentation.
//!
//! This module provides the [`ApiClient`] struct for invoking typed
//! [`Operation`]s: marshal once, then per attempt acquire a connection
//! permit, sign, send and classify the response, retrying per the
//! [`RetryPolicy`] until success, a non-retryable error, the deadline or
//! cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{Span, debug, instrument, warn};
use url::Url;

use crate::auth::{Anonymous, Credentials};
use crate::config::ClientConfig;
use crate::descriptor::OperationDescriptor;
use crate::error::{ApiError, ConfigError, DeserializationError, NetworkError, ServiceError};
use crate::marshal::{WireRequest, marshal};
use crate::operation::Operation;
use crate::resolver::{EndpointResolver, StaticEndpoint};

use super::options::CallOptions;
use super::retry::RetryPolicy;

const APPLICATION_JSON: &str = "application/json";

/// Builder for configuring an [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
    resolver: Arc<dyn EndpointResolver>,
    credentials: Arc<dyn Credentials>,
    config: ClientConfig,
    default_headers: Vec<(String, String)>,
}

impl ApiClientBuilder {
    fn new(resolver: Arc<dyn EndpointResolver>) -> Self {
        Self {
            resolver,
            credentials: Arc::new(Anonymous),
            config: ClientConfig::default(),
            default_headers: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the credentials used to sign every attempt.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use mlsdk_core::auth::BearerToken;
    /// use mlsdk_core::resolver::StaticEndpoint;
    /// use mlsdk_core::ApiClient;
    ///
    /// # fn main() -> Result<(), mlsdk_core::ConfigError> {
    /// let client = ApiClient::builder(StaticEndpoint::parse("http://localhost:8080")?)
    ///     .credentials(BearerToken::new("tok"))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn credentials(mut self, credentials: impl Credentials + 'static) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }

    /// Sets the default deadline of a whole call, retries included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    /// Bounds concurrently in-flight requests. Values below 1 are raised to 1.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.config.max_connections = max_connections.max(1);
        self
    }

    /// Adds a header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if the name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let (name, value) = (name.as_ref(), value.as_ref());
        validate_header(name, value)?;
        self.default_headers
            .push((name.to_string(), value.to_string()));
        Ok(self)
    }

    /// Builds the [`ApiClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ApiClient, ConfigError> {
        let http = reqwest::Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .pool_max_idle_per_host(self.config.max_connections)
            .user_agent(self.config.user_agent.as_str())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let permits = Arc::new(Semaphore::new(self.config.max_connections.max(1)));

        Ok(ApiClient {
            http,
            resolver: self.resolver,
            credentials: self.credentials,
            config: self.config,
            default_headers: self.default_headers,
            permits,
        })
    }
}

/// Async client for invoking typed operations.
///
/// The client wraps `reqwest::Client` with connection pooling, bounds
/// in-flight requests with a semaphore, and is cheap to clone: clones share
/// the pool and the permits.
///
/// ## Examples
///
/// ```rust,ignore
/// use mlsdk_core::ApiClient;
///
/// let client = ApiClient::with_base_url("https://training.us-east-1.ml.example.com")?;
/// let job = client.invoke(&DescribeTrainingJob::new("my-job")).await?;
/// println!("{:?}", job.training_job_status);
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    resolver: Arc<dyn EndpointResolver>,
    credentials: Arc<dyn Credentials>,
    config: ClientConfig,
    default_headers: Vec<(String, String)>,
    permits: Arc<Semaphore>,
}

impl ApiClient {
    /// Creates a new builder resolving endpoints through `resolver`.
    pub fn builder(resolver: impl EndpointResolver + 'static) -> ApiClientBuilder {
        ApiClientBuilder::new(Arc::new(resolver))
    }

    /// Creates an anonymous client with default settings sending every
    /// operation to `base_url`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// constructed.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self::builder(StaticEndpoint::parse(base_url)?).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connection permits not currently checked out.
    pub fn available_connections(&self) -> usize {
        self.permits.available_permits()
    }

    /// Invokes `request` with the client defaults.
    ///
    /// ## Errors
    ///
    /// See [`invoke_with`](Self::invoke_with).
    pub async fn invoke<O: Operation>(&self, request: &O) -> Result<O::Output, ApiError> {
        self.invoke_with(request, &CallOptions::default()).await
    }

    /// Invokes `request` with per-call overrides.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - the request fails local validation (never sent)
    /// - credentials cannot sign the request
    /// - the service answers with a fault that is not retryable, or retries
    ///   are exhausted
    /// - the deadline expires ([`ApiError::Timeout`]) or the call is
    ///   cancelled ([`ApiError::Cancelled`])
    /// - the response body does not match the result type
    pub async fn invoke_with<O: Operation>(
        &self,
        request: &O,
        options: &CallOptions,
    ) -> Result<O::Output, ApiError> {
        self.execute(O::descriptor(), request, options).await
    }

    /// Runs `descriptor` with any serializable request and decodes the
    /// success body into `T`.
    #[instrument(
        name = "api_request",
        skip(self, descriptor, request, options),
        fields(
            operation = %descriptor.id(),
            request_id = tracing::field::Empty,
            http.method = %descriptor.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub(crate) async fn execute<R, T>(
        &self,
        descriptor: &OperationDescriptor,
        request: &R,
        options: &CallOptions,
    ) -> Result<T, ApiError>
    where
        R: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let wire = marshal(descriptor, request)?;
        let url = self.url_for(descriptor, &wire)?;
        let request_id = format!("{:016x}", rand::random::<u64>());

        let span = Span::current();
        span.record("request_id", request_id.as_str());
        span.record("http.url", url.as_str());

        let wire = self.with_standard_headers(wire, &request_id);
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let policy = match options.max_attempts {
            Some(n) => self.config.retry.clone().with_max_attempts(n),
            None => self.config.retry.clone(),
        };
        let attempts = AtomicU32::new(0);

        let deadline = tokio::time::timeout(
            timeout,
            self.send_with_retry(descriptor, &wire, &url, &request_id, &policy, &attempts),
        );
        let outcome = match &options.cancel {
            Some(cancel) => tokio::select! {
                biased;
                () = cancel.cancelled() => Ok(Err(ApiError::Cancelled)),
                outcome = deadline => outcome,
            },
            None => deadline.await,
        };

        let result = outcome.unwrap_or_else(|_| {
            Err(ApiError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                attempts: attempts.load(Ordering::Relaxed),
            })
        });

        match result {
            Ok(body) => {
                span.record("otel.status_code", "OK");
                decode(descriptor, &body)
            }
            Err(err) => {
                let otel_status = if err.is_local() { "UNSET" } else { "ERROR" };
                span.record("otel.status_code", otel_status);
                Err(err)
            }
        }
    }

    /// Resolves the endpoint and appends the marshaled path.
    fn url_for(&self, descriptor: &OperationDescriptor, wire: &WireRequest) -> Result<Url, ConfigError> {
        let base = self.resolver.resolve(descriptor, &self.config.region)?;
        let base = base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{}", wire.path))?)
    }

    fn with_standard_headers(&self, wire: WireRequest, request_id: &str) -> WireRequest {
        let mut wire = wire;
        for (name, value) in &self.default_headers {
            wire = wire.with_header(name.as_str(), value.as_str());
        }
        wire.with_header("content-type", APPLICATION_JSON)
            .with_header("accept", APPLICATION_JSON)
            .with_header("x-request-id", request_id)
    }

    async fn send_with_retry(
        &self,
        descriptor: &OperationDescriptor,
        wire: &WireRequest,
        url: &Url,
        request_id: &str,
        policy: &RetryPolicy,
        attempts: &AtomicU32,
    ) -> Result<Bytes, ApiError> {
        loop {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(attempt, max_attempts = policy.max_attempts(), "sending request");

            match self.send_once(wire.clone(), url, request_id).await {
                Ok(body) => return Ok(body),
                Err(err) if policy.should_retry(attempt, wire.method, &err) => {
                    let delay = policy.delay_for(attempt, &err);
                    warn!(
                        operation = %descriptor.id(),
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One attempt. The permit is held until the body has been read and is
    /// released when this future completes or is dropped.
    async fn send_once(
        &self,
        wire: WireRequest,
        url: &Url,
        request_id: &str,
    ) -> Result<Bytes, ApiError> {
        let _permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| NetworkError::Connection("connection pool closed".to_string()))?;

        let signed = self.credentials.sign(wire)?;

        let mut request = self.http.request(signed.method.to_reqwest(), url.clone());
        if !signed.query.is_empty() {
            request = request.query(&signed.query);
        }
        for (name, value) in &signed.headers {
            let (name, value) = validate_header(name, value)?;
            request = request.header(name, value);
        }
        if let Some(body) = signed.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(NetworkError::from)?;
        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::Body(e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        let err = ServiceError::from_response(status.as_u16(), &headers, &body);
        let err = match err.request_id {
            Some(_) => err,
            None => err.with_request_id(request_id),
        };
        debug!(status = err.status, code = %err.code, "service fault");
        Err(err.into())
    }
}

fn validate_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidHeader {
        name: name.to_string(),
        message,
    };
    let header_name = HeaderName::try_from(name).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::try_from(value).map_err(|e| invalid(e.to_string()))?;
    Ok((header_name, header_value))
}

/// Deserializes a success body; an empty body reads as `{}`.
fn decode<T: DeserializeOwned>(descriptor: &OperationDescriptor, body: &[u8]) -> Result<T, ApiError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|e| DeserializationError::from_json(descriptor.id().as_str(), &e).into())
}
