//! Batch machine learning model operations.
//!
//! ## Operations
//!
//! - [`GetMlModel`] - GET /ml-models/{mLModelId}

mod types;

pub use types::{
    EntityStatus, GetMlModelResult, MlModelType, RealtimeEndpointInfo, RealtimeEndpointStatus,
};

use mlsdk_core::descriptor::{Member, OperationDescriptor};
use mlsdk_core::{ConfigError, Operation, RestMethod};
use once_cell::sync::Lazy;
use serde::Serialize;

/// Service name used for endpoint resolution.
pub const SERVICE: &str = "machinelearning";

/// Returns a model with its metadata, status and data files.
///
/// With `verbose` set, the result also carries the model recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GetMlModel {
    #[serde(rename = "mLModelId", skip_serializing_if = "Option::is_none")]
    pub ml_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl GetMlModel {
    pub fn new(ml_model_id: impl Into<String>) -> Self {
        Self {
            ml_model_id: Some(ml_model_id.into()),
            verbose: None,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }
}

fn get_ml_model_descriptor() -> Result<OperationDescriptor, ConfigError> {
    OperationDescriptor::builder()
        .id("GetMLModel")
        .method(RestMethod::Get)
        .uri("/ml-models/{mLModelId}")
        .service(SERVICE)
        .description("Returns a model with its metadata and status")
        .member(
            Member::path("mLModelId")
                .length(1, 64)
                .pattern("[a-zA-Z0-9_.-]+")?,
        )
        .member(Member::query("verbose"))
        .build()
}

static GET_ML_MODEL: Lazy<OperationDescriptor> =
    Lazy::new(|| get_ml_model_descriptor().expect("GetMLModel descriptor is valid"));

impl Operation for GetMlModel {
    type Output = GetMlModelResult;

    fn descriptor() -> &'static OperationDescriptor {
        &GET_ML_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlsdk_core::{ApiError, ValidationError, marshal};

    #[test]
    fn descriptor_builds() {
        let descriptor = get_ml_model_descriptor().unwrap();
        assert_eq!(descriptor.id().as_str(), "GetMLModel");
        assert_eq!(descriptor.service(), SERVICE);
        assert_eq!(descriptor.path_params(), vec!["mLModelId"]);
    }

    #[test]
    fn marshals_path_and_flag() {
        let wire = marshal(GetMlModel::descriptor(), &GetMlModel::new("ml-abc.1").verbose(true))
            .unwrap();
        assert_eq!(wire.path, "/ml-models/ml-abc.1");
        assert_eq!(wire.query_param("verbose").collect::<Vec<_>>(), vec!["true"]);
        assert!(wire.body.is_none());
    }

    #[test]
    fn rejects_id_outside_pattern() {
        let err = marshal(GetMlModel::descriptor(), &GetMlModel::new("ml/abc")).unwrap_err();
        match err {
            ApiError::Validation(ValidationError::Constraint { field, .. }) => {
                assert_eq!(field, "mLModelId");
            }
            other => panic!("expected a constraint violation, got {other:?}"),
        }
    }

    #[test]
    fn missing_id_is_reported() {
        let err = marshal(GetMlModel::descriptor(), &GetMlModel::default()).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::MissingRequiredField { ref name }) if name == "mLModelId"
        ));
    }
}
