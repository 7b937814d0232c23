//! Layered error types for the runtime.
//!
//! The error hierarchy separates failures by where they happen:
//! - [`ApiError`] - Top-level error type returned by every public operation
//! - [`ValidationError`] - Local, pre-flight request validation (never sent)
//! - [`InvalidEnumValue`] / [`DuplicateKey`] - Model construction failures
//! - [`ServiceError`] - An error response received from the service
//! - [`DeserializationError`] - A success response with an unexpected shape
//! - [`NetworkError`] - Transport-level failures
//! - [`AuthError`] - Request signing and credential errors
//! - [`ConfigError`] - Client and operation descriptor configuration errors

mod api_error;
mod auth_error;
mod config_error;
mod deserialization_error;
mod model_error;
mod network_error;
mod service_error;
mod validation_error;

pub use api_error::ApiError;
pub use auth_error::AuthError;
pub use config_error::ConfigError;
pub use deserialization_error::DeserializationError;
pub use model_error::{DuplicateKey, InvalidEnumValue};
pub use network_error::NetworkError;
pub use service_error::{FaultKind, ServiceError};
pub use validation_error::ValidationError;
