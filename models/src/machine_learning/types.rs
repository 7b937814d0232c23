//! Result shapes and value sets of the batch machine learning API.

use chrono::{DateTime, Utc};
use mlsdk_core::{WireMap, wire_enum};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// Lifecycle state of a model, datasource or evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum EntityStatus {
    #[strum(serialize = "PENDING")]
    Pending,
    #[strum(serialize = "INPROGRESS")]
    InProgress,
    #[strum(serialize = "FAILED")]
    Failed,
    #[strum(serialize = "COMPLETED")]
    Completed,
    #[strum(serialize = "DELETED")]
    Deleted,
}
wire_enum!(EntityStatus);

/// Kind of prediction a model makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum MlModelType {
    #[strum(serialize = "REGRESSION")]
    Regression,
    #[strum(serialize = "BINARY")]
    Binary,
    #[strum(serialize = "MULTICLASS")]
    Multiclass,
}
wire_enum!(MlModelType);

/// Whether a real-time endpoint is serving the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum RealtimeEndpointStatus {
    #[strum(serialize = "NONE")]
    None,
    #[strum(serialize = "READY")]
    Ready,
    #[strum(serialize = "UPDATING")]
    Updating,
    #[strum(serialize = "FAILED")]
    Failed,
}
wire_enum!(RealtimeEndpointStatus);

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeEndpointInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_requests_per_second: Option<u32>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_status: Option<RealtimeEndpointStatus>,
}

/// Result of `GetMlModel`.
///
/// `score_threshold` is a float, so the type is only `PartialEq`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMlModelResult {
    #[serde(rename = "mLModelId", skip_serializing_if = "Option::is_none")]
    pub ml_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_data_source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_iam_user: Option<String>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_info: Option<RealtimeEndpointInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_parameters: Option<WireMap>,
    #[serde(rename = "inputDataLocationS3", skip_serializing_if = "Option::is_none")]
    pub input_data_location_s3: Option<String>,
    #[serde(rename = "mLModelType", skip_serializing_if = "Option::is_none")]
    pub ml_model_type: Option<MlModelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub score_threshold_last_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_time: Option<u64>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, with = "mlsdk_core::timestamp", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl GetMlModelResult {
    /// Returns `true` once the model can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            Some(EntityStatus::Completed | EntityStatus::Failed | EntityStatus::Deleted)
        )
    }
}
