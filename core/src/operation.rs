//! Traits implemented by typed request objects.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::descriptor::OperationDescriptor;

/// A typed API operation.
///
/// The implementing type is the request object; [`Operation::Output`] is the
/// result object the response body deserializes into. The descriptor is a
/// process-wide static shared by every call.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::descriptor::{Member, OperationDescriptor};
/// use mlsdk_core::{Operation, RestMethod};
/// use once_cell::sync::Lazy;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct DescribeTrainingJob {
///     training_job_name: Option<String>,
/// }
///
/// #[derive(Deserialize)]
/// struct DescribeTrainingJobResult {
///     status: Option<String>,
/// }
///
/// static DESCRIBE: Lazy<OperationDescriptor> = Lazy::new(|| {
///     OperationDescriptor::builder()
///         .id("DescribeTrainingJob")
///         .method(RestMethod::Get)
///         .uri("/training-jobs/{trainingJobName}")
///         .member(Member::path("trainingJobName"))
///         .build()
///         .expect("DescribeTrainingJob descriptor is valid")
/// });
///
/// impl Operation for DescribeTrainingJob {
///     type Output = DescribeTrainingJobResult;
///
///     fn descriptor() -> &'static OperationDescriptor {
///         &DESCRIBE
///     }
/// }
///
/// assert_eq!(DescribeTrainingJob::descriptor().id().as_str(), "DescribeTrainingJob");
/// ```
pub trait Operation: Serialize + Send + Sync {
    /// The result object.
    type Output: DeserializeOwned + Send;

    /// Static metadata for this operation.
    fn descriptor() -> &'static OperationDescriptor;
}

/// An operation whose requests carry a continuation token.
///
/// Which request member and result field hold the token is declared by the
/// descriptor's [`Pagination`](crate::descriptor::Pagination).
pub trait PagedOperation: Operation {}

/// A result object that is one page of a listing.
pub trait PagedOutput {
    /// The element type of the listing.
    type Item;

    /// Consumes the page, returning its items.
    fn into_items(self) -> Vec<Self::Item>;
}
