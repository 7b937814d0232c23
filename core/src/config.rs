//! Client configuration with environment overrides.

use std::time::Duration;

use crate::client::RetryPolicy;
use crate::error::ConfigError;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("mlsdk/", env!("CARGO_PKG_VERSION"));

pub const ENV_REGION: &str = "MLSDK_REGION";
pub const ENV_TIMEOUT_MS: &str = "MLSDK_TIMEOUT_MS";
pub const ENV_MAX_ATTEMPTS: &str = "MLSDK_MAX_ATTEMPTS";
pub const ENV_MAX_CONNECTIONS: &str = "MLSDK_MAX_CONNECTIONS";

/// Settings consumed by [`ApiClientBuilder`](crate::client::ApiClientBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Region passed to the endpoint resolver.
    pub region: String,
    /// Default deadline for a whole call, retries included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Upper bound on concurrently in-flight requests.
    pub max_connections: usize,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_connections: 10,
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `MLSDK_*` environment variables.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidEnvValue`] when a numeric variable does
    /// not parse or is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(region) = lookup(ENV_REGION).filter(|r| !r.trim().is_empty()) {
            config.region = region.trim().to_string();
        }
        if let Some(ms) = positive(&lookup, ENV_TIMEOUT_MS)? {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(attempts) = positive(&lookup, ENV_MAX_ATTEMPTS)? {
            let attempts = u32::try_from(attempts).map_err(|_| ConfigError::InvalidEnvValue {
                var: ENV_MAX_ATTEMPTS,
                value: attempts.to_string(),
            })?;
            config.retry = config.retry.with_max_attempts(attempts);
        }
        if let Some(max) = positive(&lookup, ENV_MAX_CONNECTIONS)? {
            config.max_connections = max as usize;
        }

        Ok(config)
    }
}

/// Reads a strictly positive integer variable, if set.
fn positive<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidEnvValue { var, value: raw }),
    }
}
