//! Client and operation descriptor configuration errors.

use thiserror::Error;

use crate::operation_id::OperationIdError;

/// Errors in client setup or operation descriptor construction.
///
/// These indicate programmer errors or invalid configuration and are
/// raised before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required configuration field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Operation id validation failed.
    #[error("Invalid operation ID: {0}")]
    InvalidOperationId(#[from] OperationIdError),

    /// URI template and path bindings disagree.
    #[error("Invalid path template: {message}")]
    InvalidPathTemplate {
        /// Description of the path template error.
        message: String,
    },

    /// A `Pattern` constraint does not compile.
    #[error("Invalid pattern for member {member}: {source}")]
    InvalidPattern {
        /// Member the pattern was declared on.
        member: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// Two members of the same shape share a wire name.
    #[error("Duplicate member: {name}")]
    DuplicateMember {
        /// The duplicate wire name.
        name: String,
    },

    /// Metadata refers to a member the shape does not declare.
    #[error("Operation {operation} has no member named {name}")]
    UnknownMember {
        /// Operation id.
        operation: String,
        /// The missing member name.
        name: String,
    },

    /// Pagination was requested for an operation without pagination metadata.
    #[error("Operation {operation} is not paginated")]
    NotPaginated {
        /// Operation id.
        operation: String,
    },

    /// A page size was requested for an operation without a limit member.
    #[error("Operation {operation} has no page size member")]
    NoPageLimit {
        /// Operation id.
        operation: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name as given.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// An environment variable holds a value that cannot be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnvValue {
        /// Environment variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl ConfigError {
    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates an invalid path template error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPathTemplate {
            message: message.into(),
        }
    }
}
