//! Training job operations.
//!
//! ## Operations
//!
//! - [`CreateTrainingJob`] - POST /training-jobs
//! - [`DescribeTrainingJob`] - GET /training-jobs/{trainingJobName}
//! - [`ListTrainingJobs`] - GET /training-jobs (paginated)
//! - [`StopTrainingJob`] - POST /training-jobs/{trainingJobName}/stop

mod enums;
mod types;

pub use enums::{
    SecondaryStatus, SortBy, SortOrder, TrainingInputMode, TrainingInstanceType,
    TrainingJobStatus,
};
pub use types::{
    AlgorithmSpecification, Channel, CreateTrainingJobResult, DataSource, ListTrainingJobsResult,
    OutputDataConfig, ResourceConfig, S3DataSource, StopTrainingJobResult, StoppingCondition, Tag,
    TrainingJob, TrainingJobSummary,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mlsdk_core::descriptor::{Constraint, Member, OperationDescriptor, Pagination, Shape};
use mlsdk_core::{ConfigError, DuplicateKey, Operation, PagedOperation, RestMethod, WireMap};
use once_cell::sync::Lazy;
use serde::Serialize;

/// Service name used for endpoint resolution.
pub const SERVICE: &str = "training";

const JOB_NAME_PATTERN: &str = "[a-zA-Z0-9](-*[a-zA-Z0-9])*";
const ROLE_ARN_PATTERN: &str = r"arn:aws[a-z\-]*:iam::\d{12}:role/?[a-zA-Z_0-9+=,.@\-_/]+";
const S3_URI_PATTERN: &str = r"(https|s3)://([^/]+)/?(.*)";

fn at_least(min: f64) -> Constraint {
    Constraint::Range {
        min: Some(min),
        max: None,
    }
}

fn job_name(member: Member) -> Result<Member, ConfigError> {
    member.length(1, 63).pattern(JOB_NAME_PATTERN)
}

fn algorithm_specification_shape() -> Result<Arc<Shape>, ConfigError> {
    Shape::shared(
        "AlgorithmSpecification",
        vec![
            Member::body("trainingImage").max_length(255),
            Member::body("algorithmName").length(1, 170),
            Member::body("trainingInputMode").required(),
        ],
    )
}

fn channel_shape() -> Result<Arc<Shape>, ConfigError> {
    let s3 = Shape::shared(
        "S3DataSource",
        vec![
            Member::body("s3DataType").required(),
            Member::body("s3Uri")
                .required()
                .max_length(1024)
                .pattern(S3_URI_PATTERN)?,
        ],
    )?;
    let data_source = Shape::shared(
        "DataSource",
        vec![Member::body("s3DataSource").shape(s3)],
    )?;
    Shape::shared(
        "Channel",
        vec![
            Member::body("channelName")
                .required()
                .length(1, 64)
                .pattern(r"[A-Za-z0-9\.\-_]+")?,
            Member::body("dataSource").required().shape(data_source),
            Member::body("contentType").max_length(256),
            Member::body("inputMode"),
        ],
    )
}

fn output_data_config_shape() -> Result<Arc<Shape>, ConfigError> {
    Shape::shared(
        "OutputDataConfig",
        vec![
            Member::body("kmsKeyId").max_length(2048),
            Member::body("s3OutputPath")
                .required()
                .max_length(1024)
                .pattern(S3_URI_PATTERN)?,
        ],
    )
}

fn resource_config_shape() -> Result<Arc<Shape>, ConfigError> {
    Shape::shared(
        "ResourceConfig",
        vec![
            Member::body("instanceType").required(),
            Member::body("instanceCount").required().constraint(at_least(1.0)),
            Member::body("volumeSizeInGB").required().constraint(at_least(1.0)),
        ],
    )
}

fn stopping_condition_shape() -> Result<Arc<Shape>, ConfigError> {
    Shape::shared(
        "StoppingCondition",
        vec![
            Member::body("maxRuntimeInSeconds").constraint(at_least(1.0)),
            Member::body("maxWaitTimeInSeconds").constraint(at_least(1.0)),
        ],
    )
}

fn tag_shape() -> Result<Arc<Shape>, ConfigError> {
    Shape::shared(
        "Tag",
        vec![
            Member::body("key").required().length(1, 128),
            Member::body("value").required().max_length(256),
        ],
    )
}

// ============================================================================
// CreateTrainingJob
// ============================================================================

/// Starts a model training job.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_models::training::CreateTrainingJob;
///
/// let request = CreateTrainingJob::new("xgb-churn-1")
///     .add_hyper_parameters_entry("eta", "0.2").unwrap()
///     .add_hyper_parameters_entry("max_depth", "5").unwrap();
/// assert!(request.clone().add_hyper_parameters_entry("eta", "0.3").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainingJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyper_parameters: Option<WireMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm_specification: Option<AlgorithmSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data_config: Option<Vec<Channel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_data_config: Option<OutputDataConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_config: Option<ResourceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopping_condition: Option<StoppingCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_network_isolation: Option<bool>,
}

impl CreateTrainingJob {
    pub fn new(training_job_name: impl Into<String>) -> Self {
        Self {
            training_job_name: Some(training_job_name.into()),
            ..Self::default()
        }
    }

    /// Adds one hyperparameter.
    ///
    /// ## Errors
    ///
    /// Returns [`DuplicateKey`] if `key` was already added.
    pub fn add_hyper_parameters_entry(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, DuplicateKey> {
        let map = self.hyper_parameters.take().unwrap_or_default();
        self.hyper_parameters = Some(map.with_entry(key, value)?);
        Ok(self)
    }

    /// Removes every hyperparameter, leaving the field unset.
    pub fn clear_hyper_parameters_entries(mut self) -> Self {
        self.hyper_parameters = None;
        self
    }
}

fn create_training_job_descriptor() -> Result<OperationDescriptor, ConfigError> {
    OperationDescriptor::builder()
        .id("CreateTrainingJob")
        .method(RestMethod::Post)
        .uri("/training-jobs")
        .service(SERVICE)
        .description("Starts a model training job")
        .member(job_name(Member::body("trainingJobName").required())?)
        .member(Member::body("hyperParameters").max_length(100))
        .member(
            Member::body("algorithmSpecification")
                .required()
                .shape(algorithm_specification_shape()?),
        )
        .member(
            Member::body("roleArn")
                .required()
                .length(20, 2048)
                .pattern(ROLE_ARN_PATTERN)?,
        )
        .member(
            Member::body("inputDataConfig")
                .length(1, 20)
                .shape(channel_shape()?),
        )
        .member(
            Member::body("outputDataConfig")
                .required()
                .shape(output_data_config_shape()?),
        )
        .member(
            Member::body("resourceConfig")
                .required()
                .shape(resource_config_shape()?),
        )
        .member(
            Member::body("stoppingCondition")
                .required()
                .shape(stopping_condition_shape()?),
        )
        .member(Member::body("tags").max_length(50).shape(tag_shape()?))
        .member(Member::body("enableNetworkIsolation"))
        .build()
}

static CREATE_TRAINING_JOB: Lazy<OperationDescriptor> = Lazy::new(|| {
    create_training_job_descriptor().expect("CreateTrainingJob descriptor is valid")
});

impl Operation for CreateTrainingJob {
    type Output = CreateTrainingJobResult;

    fn descriptor() -> &'static OperationDescriptor {
        &CREATE_TRAINING_JOB
    }
}

// ============================================================================
// DescribeTrainingJob
// ============================================================================

/// Returns information about a training job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTrainingJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_name: Option<String>,
}

impl DescribeTrainingJob {
    pub fn new(training_job_name: impl Into<String>) -> Self {
        Self {
            training_job_name: Some(training_job_name.into()),
        }
    }
}

fn describe_training_job_descriptor() -> Result<OperationDescriptor, ConfigError> {
    OperationDescriptor::builder()
        .id("DescribeTrainingJob")
        .method(RestMethod::Get)
        .uri("/training-jobs/{trainingJobName}")
        .service(SERVICE)
        .description("Returns information about a training job")
        .member(job_name(Member::path("trainingJobName"))?)
        .build()
}

static DESCRIBE_TRAINING_JOB: Lazy<OperationDescriptor> = Lazy::new(|| {
    describe_training_job_descriptor().expect("DescribeTrainingJob descriptor is valid")
});

impl Operation for DescribeTrainingJob {
    type Output = TrainingJob;

    fn descriptor() -> &'static OperationDescriptor {
        &DESCRIBE_TRAINING_JOB
    }
}

// ============================================================================
// ListTrainingJobs
// ============================================================================

/// Lists training jobs, one page per call.
///
/// Use [`ApiClient::paginate`](mlsdk_core::ApiClient::paginate) to walk every
/// page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTrainingJobs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub creation_time_after: Option<DateTime<Utc>>,
    #[serde(with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub creation_time_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_equals: Option<TrainingJobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

fn list_training_jobs_descriptor() -> Result<OperationDescriptor, ConfigError> {
    OperationDescriptor::builder()
        .id("ListTrainingJobs")
        .method(RestMethod::Get)
        .uri("/training-jobs")
        .service(SERVICE)
        .description("Lists training jobs")
        .member(Member::query("nextToken").max_length(8192))
        .member(Member::query("maxResults").range(1.0, 100.0))
        .member(Member::query("creationTimeAfter"))
        .member(Member::query("creationTimeBefore"))
        .member(
            Member::query("nameContains")
                .max_length(63)
                .pattern(r"[a-zA-Z0-9\-]+")?,
        )
        .member(Member::query("statusEquals"))
        .member(Member::query("sortBy"))
        .member(Member::query("sortOrder"))
        .paginated(Pagination::next_token().with_limit("maxResults"))
        .build()
}

static LIST_TRAINING_JOBS: Lazy<OperationDescriptor> = Lazy::new(|| {
    list_training_jobs_descriptor().expect("ListTrainingJobs descriptor is valid")
});

impl Operation for ListTrainingJobs {
    type Output = ListTrainingJobsResult;

    fn descriptor() -> &'static OperationDescriptor {
        &LIST_TRAINING_JOBS
    }
}

impl PagedOperation for ListTrainingJobs {}

// ============================================================================
// StopTrainingJob
// ============================================================================

/// Stops a running training job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTrainingJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_name: Option<String>,
}

impl StopTrainingJob {
    pub fn new(training_job_name: impl Into<String>) -> Self {
        Self {
            training_job_name: Some(training_job_name.into()),
        }
    }
}

fn stop_training_job_descriptor() -> Result<OperationDescriptor, ConfigError> {
    OperationDescriptor::builder()
        .id("StopTrainingJob")
        .method(RestMethod::Post)
        .uri("/training-jobs/{trainingJobName}/stop")
        .service(SERVICE)
        .description("Stops a running training job")
        .member(job_name(Member::path("trainingJobName"))?)
        .build()
}

static STOP_TRAINING_JOB: Lazy<OperationDescriptor> = Lazy::new(|| {
    stop_training_job_descriptor().expect("StopTrainingJob descriptor is valid")
});

impl Operation for StopTrainingJob {
    type Output = StopTrainingJobResult;

    fn descriptor() -> &'static OperationDescriptor {
        &STOP_TRAINING_JOB
    }
}
