//! ML Platform SDK Runtime
//!
//! This crate is the runtime beneath the typed ML platform models: it turns
//! strongly-typed operation objects into HTTP requests, sends them with
//! retries, and turns responses back into typed results or typed errors.
//!
//! ## Core Types
//!
//! ### Describing Operations
//!
//! - [`OperationDescriptor`] - Static metadata for one API call (id, method, URI template, members)
//! - [`Member`] / [`Shape`] - Where each request field goes on the wire, and its constraints
//! - [`Pagination`] - Continuation-token wiring of list operations
//! - [`Operation`] / [`PagedOperation`] / [`PagedOutput`] - Traits implemented by model types
//!
//! ### Model Building Blocks
//!
//! - [`WireEnum`] and [`wire_enum!`] - Closed string enums with strict parsing
//! - [`WireMap`] - String map rejecting duplicate keys at insertion
//! - [`timestamp`] - Epoch-seconds codec for timestamp fields
//!
//! ### Executing Operations
//!
//! - [`marshal()`] / [`WireRequest`] - Pure request marshaling and validation
//! - [`ApiClient`] - Invoker with retries, deadlines, cancellation and a bounded connection pool
//! - [`Paginator`] - Lazy page stream over list operations
//! - [`Credentials`] - Request signing (bearer token, API key header, environment)
//! - [`EndpointResolver`] - Static or regional endpoint resolution
//! - [`ClientConfig`] - Client settings with `MLSDK_*` environment overrides
//!
//! ## Examples
//!
//! ```
//! use mlsdk_core::descriptor::{Member, OperationDescriptor, Pagination};
//! use mlsdk_core::{marshal, RestMethod};
//! use serde_json::json;
//!
//! let list = OperationDescriptor::builder()
//!     .id("ListTrainingJobs")
//!     .method(RestMethod::Get)
//!     .uri("/training-jobs")
//!     .member(Member::query("nextToken"))
//!     .member(Member::query("maxResults").range(1.0, 100.0))
//!     .paginated(Pagination::next_token().with_limit("maxResults"))
//!     .build()
//!     .unwrap();
//!
//! let wire = marshal(&list, &json!({ "maxResults": 10 })).unwrap();
//! assert_eq!(wire.path, "/training-jobs");
//! assert_eq!(wire.query, vec![("maxResults".to_string(), "10".to_string())]);
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod descriptor;
pub mod enums;
pub mod error;
pub mod marshal;
pub mod method;
pub mod operation;
pub mod operation_id;
pub mod paginator;
pub mod resolver;
pub mod timestamp;
pub mod wire_map;

pub use auth::{Anonymous, ApiKeyHeader, BearerToken, Credentials, EnvCredentials};
pub use client::{ApiClient, ApiClientBuilder, CallOptions, CancelSignal, RetryPolicy};
pub use config::ClientConfig;
pub use descriptor::{Constraint, Location, Member, OperationDescriptor, Pagination, Shape};
pub use enums::WireEnum;
pub use error::{
    ApiError, AuthError, ConfigError, DeserializationError, DuplicateKey, FaultKind,
    InvalidEnumValue, NetworkError, ServiceError, ValidationError,
};
pub use marshal::{WireRequest, marshal};
pub use method::RestMethod;
pub use operation::{Operation, PagedOperation, PagedOutput};
pub use operation_id::{OperationId, OperationIdError};
pub use paginator::Paginator;
pub use resolver::{EndpointResolver, RegionalEndpoint, StaticEndpoint};
pub use wire_map::WireMap;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
