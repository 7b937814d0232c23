//! Top-level API error type.

use super::{
    AuthError, ConfigError, DeserializationError, DuplicateKey, InvalidEnumValue, NetworkError,
    ServiceError, ValidationError,
};
use thiserror::Error;

/// Top-level error type for all runtime operations.
///
/// Local failures (`Validation`, `InvalidEnum`, `DuplicateKey`, `Config`) are
/// raised before anything touches the network and are never retried.
/// `Service` and `Network` failures are retried when
/// [`is_retryable`](ApiError::is_retryable) says so.
///
/// ## Examples
///
/// ```rust,ignore
/// use mlsdk_core::error::{ApiError, FaultKind};
///
/// fn handle_error(err: ApiError) {
///     match err {
///         ApiError::Validation(e) => eprintln!("Fix the request: {e}"),
///         ApiError::Service(e) if e.kind == FaultKind::Client => eprintln!("Rejected: {e}"),
///         ApiError::Timeout { attempts, .. } => eprintln!("Gave up after {attempts} attempts"),
///         other => eprintln!("{other}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A string did not match any token of a closed enum.
    #[error(transparent)]
    InvalidEnum(#[from] InvalidEnumValue),

    /// A map entry was inserted twice.
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKey),

    /// The service answered with an error response.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A success response could not be decoded into the result type.
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    /// The caller's deadline expired before the call completed.
    #[error("Request timed out after {duration_ms}ms ({attempts} attempt(s))")]
    Timeout {
        /// The deadline that expired, in milliseconds.
        duration_ms: u64,
        /// Number of attempts started before the deadline expired.
        attempts: u32,
    },

    /// The caller cancelled the call.
    #[error("Request cancelled")]
    Cancelled,

    /// Transport-level failure (connect, reset, body read).
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Credentials could not be applied to the request.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Client or operation descriptor misconfiguration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Returns `true` if sending the same request again may succeed.
    ///
    /// Only server faults, throttling and transient network failures qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(e) => e.is_retryable(),
            Self::Network(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns `true` if this error was produced locally without any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidEnum(_) | Self::DuplicateKey(_) | Self::Config(_)
        )
    }

    /// Returns the HTTP status code when the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Service(e) => Some(e.status),
            Self::Network(e) => e.status_code(),
            _ => None,
        }
    }
}
