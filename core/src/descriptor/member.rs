//! Field binding metadata: where each request field goes on the wire.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ConfigError;

use super::constraint::Constraint;

/// Where a member is placed in the wire request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Substituted into the URI template placeholder of the same name.
    Path,
    /// Appended as a query parameter.
    Query,
    /// Sent as the named HTTP header.
    Header(String),
    /// Part of the JSON body.
    Body,
}

/// One field of a request shape.
///
/// `name` is the wire name: the key the field serializes under and, for
/// path and query members, the placeholder or parameter name.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::descriptor::Member;
///
/// # fn main() -> Result<(), mlsdk_core::ConfigError> {
/// let name = Member::body("trainingJobName")
///     .required()
///     .length(1, 63)
///     .pattern("[a-zA-Z0-9](-*[a-zA-Z0-9])*")?;
/// assert!(name.is_required());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    location: Location,
    required: bool,
    constraints: Vec<Constraint>,
    shape: Option<Arc<Shape>>,
}

impl Member {
    fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            required: false,
            constraints: Vec::new(),
            shape: None,
        }
    }

    /// A path member. Path members are always required.
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, Location::Path).required()
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, Location::Query)
    }

    pub fn header(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(name, Location::Header(header.into()))
    }

    pub fn body(name: impl Into<String>) -> Self {
        Self::new(name, Location::Body)
    }

    /// Marks the member as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Inclusive length bounds (characters for strings, entries otherwise).
    pub fn length(self, min: usize, max: usize) -> Self {
        self.constraint(Constraint::Length {
            min: Some(min),
            max: Some(max),
        })
    }

    pub fn min_length(self, min: usize) -> Self {
        self.constraint(Constraint::Length {
            min: Some(min),
            max: None,
        })
    }

    pub fn max_length(self, max: usize) -> Self {
        self.constraint(Constraint::Length {
            min: None,
            max: Some(max),
        })
    }

    /// Inclusive numeric bounds.
    pub fn range(self, min: f64, max: f64) -> Self {
        self.constraint(Constraint::Range {
            min: Some(min),
            max: Some(max),
        })
    }

    /// Full-match regex constraint.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the pattern does not compile.
    pub fn pattern(self, pattern: &str) -> Result<Self, ConfigError> {
        let constraint = Constraint::pattern(&self.name, pattern)?;
        Ok(self.constraint(constraint))
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Declares the nested structure of an object member, or of each element
    /// of a sequence member.
    pub fn shape(mut self, shape: Arc<Shape>) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn nested_shape(&self) -> Option<&Shape> {
        self.shape.as_deref()
    }
}

/// A named structure: the members of a request or of a nested object.
#[derive(Debug, Clone)]
pub struct Shape {
    name: String,
    members: Vec<Member>,
}

impl Shape {
    /// Creates a shape, rejecting repeated member names.
    pub fn new(name: impl Into<String>, members: Vec<Member>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        if let Some(dup) = members.iter().find(|m| !seen.insert(m.name())) {
            return Err(ConfigError::DuplicateMember {
                name: dup.name().to_string(),
            });
        }
        Ok(Self {
            name: name.into(),
            members,
        })
    }

    /// Creates a shape wrapped for sharing between members.
    pub fn shared(name: impl Into<String>, members: Vec<Member>) -> Result<Arc<Self>, ConfigError> {
        Self::new(name, members).map(Arc::new)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Looks up a member by wire name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_members_are_required() {
        assert!(Member::path("trainingJobName").is_required());
        assert!(!Member::query("maxResults").is_required());
    }

    #[test]
    fn test_header_location_keeps_header_name() {
        let m = Member::header("clientToken", "x-client-token");
        assert_eq!(m.location(), &Location::Header("x-client-token".to_string()));
    }

    #[test]
    fn test_constraints_accumulate() {
        let m = Member::body("maxRuntimeInSeconds").range(1.0, 432_000.0).min_length(0);
        assert_eq!(m.constraints().len(), 2);
    }

    #[test]
    fn test_shape_rejects_duplicates() {
        let err = Shape::new("Tag", vec![Member::body("key"), Member::body("key")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateMember { ref name } if name == "key"));
    }

    #[test]
    fn test_shape_lookup() {
        let shape = Shape::new("Tag", vec![Member::body("key").required(), Member::body("value")])
            .unwrap();
        assert!(shape.member("key").unwrap().is_required());
        assert!(shape.member("missing").is_none());
    }
}
