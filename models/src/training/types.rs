//! Training API structures and result types.
//!
//! Every field is optional so "unset" stays distinct from "empty"; the
//! operation descriptors decide which fields are required.

use chrono::{DateTime, Utc};
use mlsdk_core::{PagedOutput, WireMap};
use serde::{Deserialize, Serialize};

use super::enums::{SecondaryStatus, TrainingInputMode, TrainingInstanceType, TrainingJobStatus};

/// The training algorithm: a registry image or a named algorithm resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_input_mode: Option<TrainingInputMode>,
}

/// Location of a channel's data in object storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3DataSource {
    /// `S3Prefix` or `ManifestFile`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_data_source: Option<S3DataSource>,
}

/// A named input of the training job (e.g. `train`, `validation`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<TrainingInputMode>,
}

impl Channel {
    /// A channel reading every object under `s3_uri`.
    pub fn s3(name: impl Into<String>, s3_uri: impl Into<String>) -> Self {
        Self {
            channel_name: Some(name.into()),
            data_source: Some(DataSource {
                s3_data_source: Some(S3DataSource {
                    s3_data_type: Some("S3Prefix".to_string()),
                    s3_uri: Some(s3_uri.into()),
                }),
            }),
            ..Self::default()
        }
    }
}

/// Where model artifacts are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDataConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_output_path: Option<String>,
}

/// Compute resources of the training cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<TrainingInstanceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u32>,
    #[serde(rename = "volumeSizeInGB", skip_serializing_if = "Option::is_none")]
    pub volume_size_in_gb: Option<u32>,
}

/// Time limits after which the job is stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppingCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_runtime_in_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wait_time_in_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

/// Result of `CreateTrainingJob`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainingJobResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_arn: Option<String>,
}

/// Full description of a training job (result of `DescribeTrainingJob`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_status: Option<TrainingJobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_status: Option<SecondaryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
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
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub training_start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub training_end_time: Option<DateTime<Utc>>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_time_in_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable_time_in_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_network_isolation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

/// One row of `ListTrainingJobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingJobSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_arn: Option<String>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub training_end_time: Option<DateTime<Utc>>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_status: Option<TrainingJobStatus>,
}

/// One page of `ListTrainingJobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTrainingJobsResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_job_summaries: Option<Vec<TrainingJobSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl PagedOutput for ListTrainingJobsResult {
    type Item = TrainingJobSummary;

    fn into_items(self) -> Vec<TrainingJobSummary> {
        self.training_job_summaries.unwrap_or_default()
    }
}

/// Result of `StopTrainingJob`; the service answers with an empty body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopTrainingJobResult {}
