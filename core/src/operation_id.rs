//! Validated operation identifiers.

use std::fmt;

use thiserror::Error;

/// A validated operation identifier such as `ListTrainingJobs`.
///
/// Rules:
/// 1. Must start with an ASCII letter.
/// 2. Remaining characters must be ASCII alphanumeric or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId(String);

/// Reasons an operation id is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationIdError {
    #[error("OperationId cannot be empty")]
    Empty,
    #[error("OperationId must start with an ASCII letter")]
    InvalidStartCharacter,
    #[error("OperationId contains invalid character: '{0}'")]
    InvalidCharacter(char),
}

impl OperationId {
    /// Validates and wraps an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, OperationIdError> {
        let s = id.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), OperationIdError> {
        let mut chars = s.chars();

        match chars.next() {
            None => return Err(OperationIdError::Empty),
            Some(c) if !c.is_ascii_alphabetic() => {
                return Err(OperationIdError::InvalidStartCharacter)
            }
            _ => {}
        }

        if let Some(c) = chars.find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
            return Err(OperationIdError::InvalidCharacter(c));
        }

        Ok(())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OperationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for OperationId {
    type Error = OperationIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(OperationId::new("ListTrainingJobs").is_ok());
        assert!(OperationId::new("Get_ML_Model2").is_ok());
        assert!(OperationId::new("A").is_ok());
    }

    #[test]
    fn test_invalid_start() {
        assert_eq!(
            OperationId::new("_List"),
            Err(OperationIdError::InvalidStartCharacter)
        );
        assert_eq!(
            OperationId::new("2Fast"),
            Err(OperationIdError::InvalidStartCharacter)
        );
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            OperationId::new("List-Jobs"),
            Err(OperationIdError::InvalidCharacter('-'))
        );
        assert_eq!(
            OperationId::new("List Jobs"),
            Err(OperationIdError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(OperationId::new(""), Err(OperationIdError::Empty));
    }

    #[test]
    fn test_display_matches_input() {
        let id: OperationId = "StopTrainingJob".try_into().unwrap();
        assert_eq!(id.to_string(), "StopTrainingJob");
        assert_eq!(id.as_str(), "StopTrainingJob");
    }
}
