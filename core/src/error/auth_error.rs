//! Authentication and request signing errors.

use thiserror::Error;

/// Errors raised while applying credentials to a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// None of the configured environment variables held a credential.
    #[error("Missing credentials: none of the following environment variables are set: {env_vars:?}")]
    MissingCredential {
        /// The environment variable names that were checked.
        env_vars: Vec<String>,
    },

    /// The credential cannot be used as an HTTP header value.
    #[error("Invalid credential format for header {header}")]
    InvalidKeyFormat {
        /// Header the credential was destined for.
        header: String,
    },

    /// The signer refused to sign the request.
    #[error("Signing failed: {message}")]
    SigningFailed {
        /// Reason reported by the signer.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_display() {
        let err = AuthError::MissingCredential {
            env_vars: vec!["MLSDK_TOKEN".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing credentials: none of the following environment variables are set: [\"MLSDK_TOKEN\"]"
        );
    }

    #[test]
    fn test_invalid_key_format_names_header() {
        let err = AuthError::InvalidKeyFormat {
            header: "x-api-key".to_string(),
        };
        assert!(err.to_string().contains("x-api-key"));
    }
}
