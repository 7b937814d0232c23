//! Request marshaling: typed request → [`WireRequest`].
//!
//! The marshaler serializes a request with serde, validates the resulting
//! JSON tree against the operation's [`Shape`], then distributes the
//! top-level fields over the path, query string, headers and body according
//! to each member's [`Location`]. It is pure and synchronous; nothing here
//! touches the network.
//!
//! Unset fields (`None` with `skip_serializing_if`, or an explicit `null`)
//! are dropped before validation, so a `null` never reaches the wire.
//! Empty strings and empty sequences are values and are kept.

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::descriptor::{Location, OperationDescriptor, Shape};
use crate::error::{ApiError, ValidationError};
use crate::method::RestMethod;

/// Characters left as-is in a path segment (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A fully marshaled HTTP request, before endpoint resolution and signing.
///
/// Query and header values are kept raw; the transport encodes query
/// values when the URL is assembled. The path is already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: RestMethod,
    /// Percent-encoded path, always starting with `/`.
    pub path: String,
    /// Query parameters in member declaration order.
    pub query: Vec<(String, String)>,
    /// Header pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body.
    pub body: Option<Bytes>,
}

impl WireRequest {
    /// Returns the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, replacing any existing value of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Returns every value of a query parameter, in order.
    pub fn query_param<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8 text, if present.
    pub fn body_str(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Marshals `request` into a [`WireRequest`] for `descriptor`.
///
/// ## Errors
///
/// Returns [`ApiError::Validation`] when the request does not serialize to a
/// JSON object, a required member is unset, a value violates a constraint,
/// a header member is not a legal HTTP header value, or a sequence holds a
/// `null` element.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::descriptor::{Member, OperationDescriptor};
/// use mlsdk_core::{marshal, RestMethod};
/// use serde_json::json;
///
/// let describe = OperationDescriptor::builder()
///     .id("DescribeTrainingJob")
///     .method(RestMethod::Get)
///     .uri("/training-jobs/{trainingJobName}")
///     .member(Member::path("trainingJobName"))
///     .build()
///     .unwrap();
///
/// let wire = marshal(&describe, &json!({ "trainingJobName": "job 1" })).unwrap();
/// assert_eq!(wire.path, "/training-jobs/job%201");
/// assert!(wire.body.is_none());
/// ```
pub fn marshal<R>(descriptor: &OperationDescriptor, request: &R) -> Result<WireRequest, ApiError>
where
    R: Serialize + ?Sized,
{
    let value =
        serde_json::to_value(request).map_err(|e| ValidationError::Serialization(e.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(ValidationError::NotAnObject {
            type_name: std::any::type_name::<R>(),
        }
        .into());
    };

    strip_nulls(&mut fields);
    validate_shape(descriptor.input(), &fields, "")?;

    let mut path = descriptor.uri().to_string();
    let mut query = Vec::new();
    let mut headers = Vec::new();

    for member in descriptor.input().members() {
        match member.location() {
            Location::Path => {
                let value = fields
                    .remove(member.name())
                    .ok_or_else(|| ValidationError::MissingRequiredField {
                        name: member.name().to_string(),
                    })?;
                let raw = render_scalar(member.name(), &value)?;
                if raw.is_empty() {
                    return Err(ValidationError::Constraint {
                        field: member.name().to_string(),
                        constraint: "non-empty path segment".to_string(),
                        value: value.to_string(),
                    }
                    .into());
                }
                let encoded = utf8_percent_encode(&raw, PATH_SEGMENT).to_string();
                path = path.replace(&format!("{{{}}}", member.name()), &encoded);
            }
            Location::Query => match fields.remove(member.name()) {
                Some(Value::Array(items)) => {
                    for item in &items {
                        query.push((member.name().to_string(), render_scalar(member.name(), item)?));
                    }
                }
                Some(value) => {
                    query.push((member.name().to_string(), render_scalar(member.name(), &value)?));
                }
                None => {}
            },
            Location::Header(header) => {
                if let Some(value) = fields.remove(member.name()) {
                    let raw = render_scalar(member.name(), &value)?;
                    if HeaderValue::from_str(&raw).is_err() {
                        return Err(ValidationError::Constraint {
                            field: member.name().to_string(),
                            constraint: "header value".to_string(),
                            value: value.to_string(),
                        }
                        .into());
                    }
                    headers.push((header.clone(), raw));
                }
            }
            Location::Body => {}
        }
    }

    // Whatever is left (body members and undeclared fields) is the body.
    // serde_json's default map is ordered, so keys come out sorted.
    let body = if !fields.is_empty() || descriptor.method().has_body() {
        let bytes = serde_json::to_vec(&Value::Object(fields))
            .map_err(|e| ValidationError::Serialization(e.to_string()))?;
        Some(Bytes::from(bytes))
    } else {
        None
    };

    debug!(
        operation = %descriptor.id(),
        path = %path,
        query_params = query.len(),
        body_bytes = body.as_ref().map_or(0, Bytes::len),
        "marshaled request"
    );

    Ok(WireRequest {
        method: descriptor.method(),
        path,
        query,
        headers,
        body,
    })
}

/// Removes `null` object entries at every depth. Array elements are kept
/// so validation can report them.
fn strip_nulls(fields: &mut Map<String, Value>) {
    fields.retain(|_, v| !v.is_null());
    for value in fields.values_mut() {
        strip_nested(value);
    }
}

fn strip_nested(value: &mut Value) {
    match value {
        Value::Object(map) => strip_nulls(map),
        Value::Array(items) => items.iter_mut().for_each(strip_nested),
        _ => {}
    }
}

fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Validates `fields` against `shape`, depth-first in member order.
fn validate_shape(
    shape: &Shape,
    fields: &Map<String, Value>,
    prefix: &str,
) -> Result<(), ValidationError> {
    for member in shape.members() {
        let path = field_path(prefix, member.name());
        let Some(value) = fields.get(member.name()) else {
            if member.is_required() {
                return Err(ValidationError::MissingRequiredField { name: path });
            }
            continue;
        };

        if let Some(violated) = member
            .constraints()
            .iter()
            .find(|c| !c.is_satisfied_by(value))
        {
            return Err(ValidationError::Constraint {
                field: path,
                constraint: violated.to_string(),
                value: value.to_string(),
            });
        }

        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if item.is_null() {
                        return Err(ValidationError::NullElement { field: path, index });
                    }
                    if let Some(nested) = member.nested_shape() {
                        validate_nested(nested, item, &format!("{path}[{index}]"))?;
                    }
                }
            }
            _ => {
                if let Some(nested) = member.nested_shape() {
                    validate_nested(nested, value, &path)?;
                }
            }
        }
    }
    Ok(())
}

fn validate_nested(shape: &Shape, value: &Value, path: &str) -> Result<(), ValidationError> {
    match value {
        Value::Object(fields) => validate_shape(shape, fields, path),
        other => Err(ValidationError::Constraint {
            field: path.to_string(),
            constraint: format!("object of type {}", shape.name()),
            value: other.to_string(),
        }),
    }
}

/// Renders a path, query or header value as text.
fn render_scalar(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ValidationError::Constraint {
            field: field.to_string(),
            constraint: "scalar value".to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Member, Shape};
    use proptest::prelude::*;
    use serde_json::json;

    fn create_job() -> OperationDescriptor {
        let resources = Shape::shared(
            "ResourceConfig",
            vec![
                Member::body("instanceType").required(),
                Member::body("instanceCount").required().range(1.0, 100.0),
            ],
        )
        .unwrap();
        let channel = Shape::shared(
            "Channel",
            vec![Member::body("channelName").required().length(1, 64)],
        )
        .unwrap();

        OperationDescriptor::builder()
            .id("CreateTrainingJob")
            .method(RestMethod::Post)
            .uri("/training-jobs")
            .member(
                Member::body("trainingJobName")
                    .required()
                    .length(1, 63)
                    .pattern("[a-zA-Z0-9](-*[a-zA-Z0-9])*")
                    .unwrap(),
            )
            .member(Member::body("resourceConfig").shape(resources))
            .member(Member::body("inputDataConfig").length(1, 20).shape(channel))
            .member(Member::body("tags"))
            .member(Member::header("clientToken", "x-client-token"))
            .build()
            .unwrap()
    }

    fn list_jobs() -> OperationDescriptor {
        OperationDescriptor::builder()
            .id("ListTrainingJobs")
            .method(RestMethod::Get)
            .uri("/training-jobs")
            .member(Member::query("nextToken"))
            .member(Member::query("maxResults").range(1.0, 100.0))
            .member(Member::query("statusEquals"))
            .build()
            .unwrap()
    }

    fn stop_job() -> OperationDescriptor {
        OperationDescriptor::builder()
            .id("StopTrainingJob")
            .method(RestMethod::Post)
            .uri("/training-jobs/{trainingJobName}/stop")
            .member(Member::path("trainingJobName"))
            .build()
            .unwrap()
    }

    fn validation(err: ApiError) -> ValidationError {
        match err {
            ApiError::Validation(v) => v,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_path_segment_is_percent_encoded() {
        let wire = marshal(&stop_job(), &json!({ "trainingJobName": "a b/c~d" })).unwrap();
        assert_eq!(wire.path, "/training-jobs/a%20b%2Fc~d/stop");
        assert_eq!(wire.method, RestMethod::Post);
        // POST always carries a body, even with no body members.
        assert_eq!(wire.body_str(), Some("{}"));
    }

    #[test]
    fn test_empty_path_value_rejected() {
        let err = validation(marshal(&stop_job(), &json!({ "trainingJobName": "" })).unwrap_err());
        assert_eq!(err.field(), Some("trainingJobName"));
    }

    #[test]
    fn test_query_in_declaration_order_with_repeats() {
        let wire = marshal(
            &list_jobs(),
            &json!({ "statusEquals": ["Completed", "Failed"], "maxResults": 10, "nextToken": "t1" }),
        )
        .unwrap();
        assert_eq!(
            wire.query,
            vec![
                ("nextToken".to_string(), "t1".to_string()),
                ("maxResults".to_string(), "10".to_string()),
                ("statusEquals".to_string(), "Completed".to_string()),
                ("statusEquals".to_string(), "Failed".to_string()),
            ]
        );
        assert_eq!(wire.query_param("statusEquals").count(), 2);
        assert!(wire.body.is_none());
    }

    #[test]
    fn test_unset_fields_produce_no_key() {
        let wire = marshal(&list_jobs(), &json!({ "nextToken": null })).unwrap();
        assert!(wire.query.is_empty());

        let wire = marshal(&create_job(), &json!({ "trainingJobName": "job", "tags": null })).unwrap();
        assert_eq!(wire.body_str(), Some(r#"{"trainingJobName":"job"}"#));
    }

    #[test]
    fn test_empty_values_are_still_emitted() {
        let wire = marshal(&list_jobs(), &json!({ "nextToken": "" })).unwrap();
        assert_eq!(wire.query, vec![("nextToken".to_string(), String::new())]);

        let wire = marshal(&create_job(), &json!({ "trainingJobName": "job", "tags": [] })).unwrap();
        assert_eq!(wire.body_str(), Some(r#"{"tags":[],"trainingJobName":"job"}"#));
    }

    #[test]
    fn test_header_member() {
        let wire = marshal(
            &create_job(),
            &json!({ "trainingJobName": "job", "clientToken": "abc" }),
        )
        .unwrap();
        assert_eq!(wire.header("X-Client-Token"), Some("abc"));
        assert!(!wire.body_str().unwrap().contains("clientToken"));
    }

    #[test]
    fn test_illegal_header_value_rejected() {
        for token in ["tök\nen", "line\r\nbreak", "nul\0"] {
            let err = validation(
                marshal(
                    &create_job(),
                    &json!({ "trainingJobName": "job", "clientToken": token }),
                )
                .unwrap_err(),
            );
            assert_eq!(err.field(), Some("clientToken"));
            assert!(matches!(
                err,
                ValidationError::Constraint { ref constraint, .. } if constraint == "header value"
            ));
        }
    }

    #[test]
    fn test_body_keys_sorted() {
        let wire = marshal(
            &create_job(),
            &json!({
                "trainingJobName": "job",
                "resourceConfig": { "instanceType": "ml.m5.large", "instanceCount": 2 },
            }),
        )
        .unwrap();
        assert_eq!(
            wire.body_str(),
            Some(
                r#"{"resourceConfig":{"instanceCount":2,"instanceType":"ml.m5.large"},"trainingJobName":"job"}"#
            )
        );
    }

    #[test]
    fn test_missing_required_top_level() {
        let err = validation(marshal(&create_job(), &json!({})).unwrap_err());
        assert_eq!(
            err,
            ValidationError::MissingRequiredField {
                name: "trainingJobName".to_string()
            }
        );
    }

    #[test]
    fn test_missing_required_nested_reports_dotted_path() {
        let err = validation(
            marshal(
                &create_job(),
                &json!({ "trainingJobName": "job", "resourceConfig": { "instanceType": "ml.m5.large" } }),
            )
            .unwrap_err(),
        );
        assert_eq!(err.field(), Some("resourceConfig.instanceCount"));
    }

    #[test]
    fn test_nested_sequence_reports_indexed_path() {
        let err = validation(
            marshal(
                &create_job(),
                &json!({
                    "trainingJobName": "job",
                    "inputDataConfig": [{ "channelName": "train" }, { "channelName": "" }],
                }),
            )
            .unwrap_err(),
        );
        assert!(matches!(
            err,
            ValidationError::Constraint { ref field, .. } if field == "inputDataConfig[1].channelName"
        ));
    }

    #[test]
    fn test_null_element_in_sequence() {
        let err = validation(
            marshal(
                &create_job(),
                &json!({
                    "trainingJobName": "job",
                    "inputDataConfig": [{ "channelName": "train" }, null],
                }),
            )
            .unwrap_err(),
        );
        assert_eq!(
            err,
            ValidationError::NullElement {
                field: "inputDataConfig".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn test_nested_member_must_be_object() {
        let err = validation(
            marshal(
                &create_job(),
                &json!({ "trainingJobName": "job", "resourceConfig": "big" }),
            )
            .unwrap_err(),
        );
        assert!(err.to_string().contains("ResourceConfig"));
    }

    #[test]
    fn test_constraint_violations() {
        let err = validation(
            marshal(&create_job(), &json!({ "trainingJobName": "-bad-" })).unwrap_err(),
        );
        assert!(matches!(err, ValidationError::Constraint { ref constraint, .. } if constraint.starts_with("pattern")));

        let long = "a".repeat(64);
        let err = validation(marshal(&create_job(), &json!({ "trainingJobName": long })).unwrap_err());
        assert!(matches!(err, ValidationError::Constraint { ref constraint, .. } if constraint == "length 1..=63"));

        let err = validation(marshal(&list_jobs(), &json!({ "maxResults": 1000 })).unwrap_err());
        assert_eq!(err.field(), Some("maxResults"));
    }

    #[test]
    fn test_non_scalar_query_rejected() {
        let err = validation(
            marshal(&list_jobs(), &json!({ "nextToken": { "a": 1 } })).unwrap_err(),
        );
        assert!(matches!(err, ValidationError::Constraint { ref constraint, .. } if constraint == "scalar value"));
    }

    #[test]
    fn test_not_an_object() {
        let err = validation(marshal(&list_jobs(), &42_u32).unwrap_err());
        assert_eq!(err, ValidationError::NotAnObject { type_name: "u32" });
    }

    #[test]
    fn test_typed_request_with_skipped_options() {
        #[derive(Serialize, Default)]
        #[serde(rename_all = "camelCase")]
        struct ListRequest {
            #[serde(skip_serializing_if = "Option::is_none")]
            next_token: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            max_results: Option<u32>,
        }

        let req = ListRequest {
            max_results: Some(5),
            ..Default::default()
        };
        let wire = marshal(&list_jobs(), &req).unwrap();
        assert_eq!(wire.query, vec![("maxResults".to_string(), "5".to_string())]);
    }

    #[test]
    fn test_with_header_replaces_case_insensitively() {
        let wire = marshal(&list_jobs(), &json!({}))
            .unwrap()
            .with_header("Accept", "text/plain")
            .with_header("accept", "application/json");
        assert_eq!(wire.headers.len(), 1);
        assert_eq!(wire.header("ACCEPT"), Some("application/json"));
    }

    proptest! {
        #[test]
        fn marshal_is_idempotent(name in "[a-z0-9]{1,20}", count in 1u32..=100, token in ".{0,16}") {
            let request = json!({
                "trainingJobName": name,
                "resourceConfig": { "instanceType": "ml.m5.large", "instanceCount": count },
                "clientToken": token,
            });
            let first = marshal(&create_job(), &request).unwrap();
            let second = marshal(&create_job(), &request).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
