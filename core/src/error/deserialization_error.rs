//! Response decoding errors.

use thiserror::Error;

/// A success response whose body does not match the result type.
///
/// Unknown fields never cause this error; missing required fields, wrong
/// value types, unknown enum tokens and malformed JSON do.
#[derive(Debug, Error)]
#[error("Failed to deserialize {operation} response: {message}")]
pub struct DeserializationError {
    /// Operation whose response failed to decode.
    pub operation: String,
    /// Decoder message, including line and column when available.
    pub message: String,
}

impl DeserializationError {
    /// Wraps a `serde_json` error for the given operation.
    pub fn from_json(operation: impl Into<String>, err: &serde_json::Error) -> Self {
        Self {
            operation: operation.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_position() {
        let json_err = serde_json::from_str::<u32>("\"seven\"").unwrap_err();
        let err = DeserializationError::from_json("GetMLModel", &json_err);
        assert_eq!(err.operation, "GetMLModel");
        assert!(err.message.contains("line 1"));
        assert!(err.to_string().starts_with("Failed to deserialize GetMLModel response"));
    }
}
