//! ML Platform Model Definitions
//!
//! Typed operations built on the primitives from `mlsdk-core`. Each service
//! is organized in its own module: request structs implementing
//! [`Operation`](mlsdk_core::Operation), result structs, nested shapes and
//! closed enums.
//!
//! ## Available Services
//!
//! - [`training`] - Training jobs (create, describe, list, stop)
//! - [`machine_learning`] - Batch ML models
//!
//! ## Examples
//!
//! ```
//! use mlsdk_core::{Operation, marshal};
//! use mlsdk_models::training::{ListTrainingJobs, SortOrder};
//!
//! let request = ListTrainingJobs {
//!     max_results: Some(10),
//!     sort_order: Some(SortOrder::Ascending),
//!     ..Default::default()
//! };
//! let wire = marshal(ListTrainingJobs::descriptor(), &request).unwrap();
//! assert_eq!(wire.path, "/training-jobs");
//! assert_eq!(wire.query.len(), 2);
//! ```

pub mod machine_learning;
pub mod prelude;
pub mod training;
