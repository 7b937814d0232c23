//! Error responses returned by the service.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use strum::Display;
use thiserror::Error;

/// Response headers that carry the service-assigned request id.
pub(crate) const REQUEST_ID_HEADERS: &[&str] = &["x-amzn-requestid", "x-request-id"];

/// Error codes that signal throttling regardless of status code.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottledException",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
    "TransactionInProgressException",
    "RequestLimitExceeded",
    "BandwidthLimitExceeded",
    "LimitExceededException",
    "RequestThrottled",
    "SlowDown",
    "PriorRequestNotComplete",
];

/// Which side of the call is to blame for an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FaultKind {
    /// The request was wrong (4xx).
    Client,
    /// The service failed to handle a valid request (5xx).
    Server,
}

impl FaultKind {
    /// Classifies an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            Self::Server
        } else {
            Self::Client
        }
    }
}

/// A structured error response from the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} fault (HTTP {status}) {code}: {message}")]
pub struct ServiceError {
    /// Client or server fault, derived from the status code.
    pub kind: FaultKind,
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Request id echoed by the service.
    pub request_id: Option<String>,
    /// How long the service asked us to wait before retrying.
    pub retry_after: Option<Duration>,
}

/// The JSON error body. Services disagree on field names, so both the
/// lower-case form and the legacy `__type` / `Message` spellings are read.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    #[serde(rename = "__type")]
    type_name: Option<String>,
    message: Option<String>,
    #[serde(rename = "Message")]
    message_legacy: Option<String>,
}

impl ServiceError {
    /// Creates an error with the fault kind derived from `status`.
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::from_status(status),
            status,
            code: code.into(),
            message: message.into(),
            request_id: None,
            retry_after: None,
        }
    }

    /// Decodes an error from a non-success response.
    ///
    /// Never fails: bodies that are not JSON fall back to the status reason
    /// as the code and the raw body text as the message. A JSON body without
    /// a message uses the status reason as the message.
    pub fn from_response(status: u16, headers: &HeaderMap, body: &[u8]) -> Self {
        let (parsed, raw_text) = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => (parsed, None),
            Err(_) => {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (ErrorBody::default(), Some(text).filter(|t| !t.is_empty()))
            }
        };

        let code = parsed
            .code
            .or_else(|| {
                parsed
                    .type_name
                    .map(|t| t.rsplit('#').next().unwrap_or_default().to_string())
            })
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| status_code_name(status));

        let message = parsed
            .message
            .or(parsed.message_legacy)
            .or(raw_text)
            .unwrap_or_else(|| status_reason(status).to_string());

        let request_id = REQUEST_ID_HEADERS
            .iter()
            .find_map(|name| headers.get(*name))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            kind: FaultKind::from_status(status),
            status,
            code,
            message,
            request_id,
            retry_after,
        }
    }

    /// Attaches the request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns `true` if the service is shedding load.
    pub fn is_throttling(&self) -> bool {
        self.status == 429 || THROTTLING_CODES.contains(&self.code.as_str())
    }

    /// Returns `true` for server faults and throttling.
    pub fn is_retryable(&self) -> bool {
        self.kind == FaultKind::Server || self.is_throttling()
    }
}

fn status_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

/// `503` becomes `ServiceUnavailable`.
fn status_code_name(status: u16) -> String {
    status_reason(status)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .collect()
}
