//! Credential providers that sign outgoing requests.
//!
//! Signing is delegated: the client hands each attempt's [`WireRequest`] to
//! a [`Credentials`] implementation and sends whatever comes back. The
//! providers here cover the simple schemes (none, bearer token, API-key
//! header, bearer token from the environment). Anything more elaborate
//! implements the trait itself.

use std::fmt;

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

use crate::error::AuthError;
use crate::marshal::WireRequest;

/// Signs a marshaled request before it is sent.
///
/// Called once per attempt, so time-based signatures are fresh on retries.
pub trait Credentials: fmt::Debug + Send + Sync {
    /// Returns the signed request.
    ///
    /// ## Errors
    ///
    /// Returns an [`AuthError`] when no credential is available or it cannot
    /// be encoded into the request.
    fn sign(&self, request: WireRequest) -> Result<WireRequest, AuthError>;
}

/// Sends requests unsigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Credentials for Anonymous {
    fn sign(&self, request: WireRequest) -> Result<WireRequest, AuthError> {
        Ok(request)
    }
}

/// Adds `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Credentials for BearerToken {
    fn sign(&self, request: WireRequest) -> Result<WireRequest, AuthError> {
        let value = format!("Bearer {}", self.token);
        HeaderValue::try_from(value.as_str()).map_err(|_| AuthError::InvalidKeyFormat {
            header: AUTHORIZATION.as_str().to_string(),
        })?;
        Ok(request.with_header(AUTHORIZATION.as_str(), value))
    }
}

/// Sends the key verbatim in a custom header (e.g. `x-api-key`).
#[derive(Clone)]
pub struct ApiKeyHeader {
    header: String,
    key: String,
}

impl ApiKeyHeader {
    pub fn new(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            key: key.into(),
        }
    }
}

impl fmt::Debug for ApiKeyHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyHeader")
            .field("header", &self.header)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Credentials for ApiKeyHeader {
    fn sign(&self, request: WireRequest) -> Result<WireRequest, AuthError> {
        let invalid = || AuthError::InvalidKeyFormat {
            header: self.header.clone(),
        };
        HeaderName::try_from(self.header.as_str()).map_err(|_| invalid())?;
        HeaderValue::try_from(self.key.as_str()).map_err(|_| invalid())?;
        Ok(request.with_header(self.header.clone(), self.key.clone()))
    }
}

/// Bearer token read from the first set environment variable of a
/// fallback chain.
///
/// Variables are read on every signing, so a rotated token is picked up
/// without rebuilding the client.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::auth::EnvCredentials;
///
/// let creds = EnvCredentials::new(["MLSDK_TOKEN", "ML_API_TOKEN"]);
/// assert_eq!(creds.env_vars(), ["MLSDK_TOKEN", "ML_API_TOKEN"]);
/// ```
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    env_vars: Vec<String>,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(["MLSDK_TOKEN"])
    }
}

impl EnvCredentials {
    pub fn new<I, S>(env_vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            env_vars: env_vars.into_iter().map(Into::into).collect(),
        }
    }

    pub fn env_vars(&self) -> &[String] {
        &self.env_vars
    }

    /// Resolves the token through `lookup`, skipping unset and empty values.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<BearerToken, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.env_vars
            .iter()
            .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()))
            .map(|token| BearerToken::new(token.trim()))
            .ok_or_else(|| AuthError::MissingCredential {
                env_vars: self.env_vars.clone(),
            })
    }

    /// Resolves the token from the process environment.
    pub fn resolve(&self) -> Result<BearerToken, AuthError> {
        self.resolve_with(|var| std::env::var(var).ok())
    }
}

impl Credentials for EnvCredentials {
    fn sign(&self, request: WireRequest) -> Result<WireRequest, AuthError> {
        self.resolve()?.sign(request)
    }
}
