//! Local request validation errors.

use thiserror::Error;

/// Errors found while validating a request against its operation descriptor.
///
/// These are raised by the marshaler before any network call is made and are
/// never retried: they indicate a bug in the calling code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A member marked required has no value.
    #[error("Missing required field: {name}")]
    MissingRequiredField {
        /// Wire path of the missing member (e.g. `resourceConfig.instanceType`).
        name: String,
    },

    /// A value violates a declared constraint.
    #[error("Field {field} violates {constraint}: got {value}")]
    Constraint {
        /// Wire path of the offending member.
        field: String,
        /// The constraint, rendered for humans (e.g. `length 1..=63`).
        constraint: String,
        /// The offending value, rendered as JSON.
        value: String,
    },

    /// A sequence contains a `null` element.
    #[error("Field {field} contains a null element at index {index}")]
    NullElement {
        /// Wire path of the sequence.
        field: String,
        /// Position of the null element.
        index: usize,
    },

    /// The request did not serialize to a JSON object.
    #[error("Request type {type_name} does not serialize to an object")]
    NotAnObject {
        /// Rust type name of the request.
        type_name: &'static str,
    },

    /// The request could not be serialized at all.
    #[error("Request serialization failed: {0}")]
    Serialization(String),
}

impl ValidationError {
    /// Returns the wire path of the field this error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredField { name } => Some(name),
            Self::Constraint { field, .. } | Self::NullElement { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_field_display() {
        let err = ValidationError::MissingRequiredField {
            name: "roleArn".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: roleArn");
        assert_eq!(err.field(), Some("roleArn"));
    }

    #[test]
    fn test_constraint_display() {
        let err = ValidationError::Constraint {
            field: "trainingJobName".to_string(),
            constraint: "length 1..=63".to_string(),
            value: "\"\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Field trainingJobName violates length 1..=63: got \"\""
        );
    }

    #[test]
    fn test_serialization_has_no_field() {
        let err = ValidationError::Serialization("key must be a string".to_string());
        assert_eq!(err.field(), None);
    }
}
