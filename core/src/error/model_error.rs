//! Errors raised while building model values.

use thiserror::Error;

/// A string that is not one of an enum's declared tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value {given:?} for {enum_name}; expected one of {allowed:?}")]
pub struct InvalidEnumValue {
    /// Name of the enum type.
    pub enum_name: &'static str,
    /// The rejected input.
    pub given: String,
    /// Every token the enum accepts, in declaration order.
    pub allowed: Vec<&'static str>,
}

/// A map entry inserted under a key that is already present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicated key ({key}) provided")]
pub struct DuplicateKey {
    /// The key that was already present.
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_display_lists_allowed() {
        let err = InvalidEnumValue {
            enum_name: "SortOrder",
            given: "ascending".to_string(),
            allowed: vec!["Ascending", "Descending"],
        };
        assert_eq!(
            err.to_string(),
            "Invalid value \"ascending\" for SortOrder; expected one of [\"Ascending\", \"Descending\"]"
        );
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = DuplicateKey {
            key: "epochs".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicated key (epochs) provided");
    }
}
