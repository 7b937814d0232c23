//! Convenient re-exports for working with the typed operations.
//!
//! ## Examples
//!
//! ```
//! use mlsdk_models::prelude::*;
//!
//! let request = DescribeTrainingJob::new("xgb-1");
//! assert_eq!(DescribeTrainingJob::descriptor().id().as_str(), "DescribeTrainingJob");
//! # let _ = request;
//! ```

// Runtime traits needed to call operations
pub use mlsdk_core::{Operation, PagedOperation, PagedOutput, WireEnum};

// Training
pub use crate::training::{
    CreateTrainingJob, CreateTrainingJobResult, DescribeTrainingJob, ListTrainingJobs,
    ListTrainingJobsResult, StopTrainingJob, StopTrainingJobResult, TrainingJob,
    TrainingJobStatus, TrainingJobSummary,
};

// Machine learning
pub use crate::machine_learning::{EntityStatus, GetMlModel, GetMlModelResult, MlModelType};
