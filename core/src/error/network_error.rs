//! Transport-level errors.

use thiserror::Error;

/// Errors from the HTTP transport layer.
///
/// These happen before a complete response is available: connection
/// failures, resets, or a body that could not be read.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request failed due to a network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to establish a connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The response body could not be read to completion.
    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl NetworkError {
    /// Returns `true` if this failure is transient.
    ///
    /// Connect failures, timeouts and interrupted bodies are transient.
    /// Builder and redirect errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Body(_) => true,
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_body() || e.is_request(),
        }
    }

    /// Returns `true` if the request never reached the server.
    ///
    /// Only a failed connect guarantees that. A timeout or a broken body may
    /// have happened after the server started processing the request.
    pub fn is_unsent(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Body(_) => false,
            Self::Request(e) => e.is_connect(),
        }
    }

    /// Returns the HTTP status code attached to the underlying error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_is_retryable() {
        let err = NetworkError::Connection("connection refused".to_string());
        assert!(err.is_retryable());
        assert!(err.is_unsent());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_body_is_retryable() {
        let err = NetworkError::Body("unexpected EOF".to_string());
        assert!(err.is_retryable());
        assert!(!err.is_unsent());
    }

    #[tokio::test]
    async fn test_refused_connection_is_retryable() {
        let client = reqwest::Client::new();
        // Port 9 (discard) on localhost is closed in test environments.
        let err = client
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("nothing listens on the discard port");
        let err = NetworkError::Request(err);
        assert!(err.is_retryable());
        assert!(err.is_unsent());
    }
}
