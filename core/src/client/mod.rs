//! HTTP client for invoking typed operations.
//!
//! - [`ApiClient`] executes operations with retries, deadlines and
//!   cancellation
//! - [`RetryPolicy`] decides which failures are retried and how long to wait
//! - [`CallOptions`] and [`CancelSignal`] carry per-call overrides

mod executor;
mod options;
mod retry;

pub use executor::{ApiClient, ApiClientBuilder};
pub use options::{CallOptions, CancelSignal};
pub use retry::RetryPolicy;
