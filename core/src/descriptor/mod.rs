//! Operation descriptors with a type-state builder.
//!
//! An [`OperationDescriptor`] is the static metadata of one API call: its
//! id, HTTP method, URI template, member bindings and pagination fields.
//! Descriptors are built once (typically in a `once_cell::sync::Lazy`
//! static) and shared read-only by every invocation. The
//! [`OperationDescriptorBuilder`] uses a type-state pattern so a descriptor
//! cannot be built without an id, a method and a URI template.

mod constraint;
mod member;

use std::marker::PhantomData;

use crate::error::ConfigError;
use crate::method::RestMethod;
use crate::operation_id::OperationId;

pub use constraint::Constraint;
pub use member::{Location, Member, Shape};

/// Marker types for builder state tracking.
pub mod builder_state {
    /// Marker for a field that has not been set.
    pub struct Missing;
    /// Marker for a field that has been set.
    pub struct Present;
}

use builder_state::{Missing, Present};

/// Continuation-token wiring of a paginated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Request member that carries the token of the page to fetch.
    pub input_token: String,
    /// Result field holding the token of the next page.
    pub output_token: String,
    /// Request member bounding the page size, if any.
    pub limit_key: Option<String>,
}

impl Pagination {
    pub fn new(input_token: impl Into<String>, output_token: impl Into<String>) -> Self {
        Self {
            input_token: input_token.into(),
            output_token: output_token.into(),
            limit_key: None,
        }
    }

    /// The conventional `nextToken` in, `nextToken` out wiring.
    pub fn next_token() -> Self {
        Self::new("nextToken", "nextToken")
    }

    pub fn with_limit(mut self, limit_key: impl Into<String>) -> Self {
        self.limit_key = Some(limit_key.into());
        self
    }
}

/// Static metadata for one API operation.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::descriptor::{Member, OperationDescriptor};
/// use mlsdk_core::RestMethod;
///
/// # fn main() -> Result<(), mlsdk_core::ConfigError> {
/// let describe = OperationDescriptor::builder()
///     .id("DescribeTrainingJob")
///     .method(RestMethod::Get)
///     .uri("/training-jobs/{trainingJobName}")
///     .service("training")
///     .member(Member::path("trainingJobName").length(1, 63))
///     .build()?;
///
/// assert_eq!(describe.path_params(), vec!["trainingJobName"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    id: OperationId,
    service: String,
    method: RestMethod,
    uri: String,
    description: Option<String>,
    input: Shape,
    pagination: Option<Pagination>,
}

impl OperationDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder() -> OperationDescriptorBuilder<Missing, Missing, Missing> {
        OperationDescriptorBuilder::new()
    }

    pub fn id(&self) -> &OperationId {
        &self.id
    }

    /// Service name used by endpoint resolvers.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn method(&self) -> RestMethod {
        self.method
    }

    /// URI template (may contain `{member}` placeholders).
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The request shape.
    pub fn input(&self) -> &Shape {
        &self.input
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }

    /// Placeholder names in the URI template, in order of appearance.
    pub fn path_params(&self) -> Vec<&str> {
        // The template was validated in `build`.
        template_params(&self.uri).unwrap_or_default()
    }
}

/// Extracts `{name}` placeholders, rejecting unbalanced or empty braces.
fn template_params(uri: &str) -> Result<Vec<&str>, ConfigError> {
    let mut params = Vec::new();
    let mut rest = uri;

    while let Some(open) = rest.find(['{', '}']) {
        if rest.as_bytes()[open] == b'}' {
            return Err(ConfigError::invalid_path(format!("unmatched '}}' in {uri}")));
        }
        let after = &rest[open + 1..];
        let close = after
            .find(['{', '}'])
            .filter(|&i| after.as_bytes()[i] == b'}')
            .ok_or_else(|| ConfigError::invalid_path(format!("unclosed brace in {uri}")))?;
        let name = &after[..close];
        if name.is_empty() {
            return Err(ConfigError::invalid_path(format!("empty placeholder in {uri}")));
        }
        params.push(name);
        rest = &after[close + 1..];
    }

    Ok(params)
}

/// Type-state builder for [`OperationDescriptor`].
///
/// ## Type Parameters
///
/// - `Id`: State of the id field (`Missing` or `Present`).
/// - `Method`: State of the method field.
/// - `Uri`: State of the URI template field.
pub struct OperationDescriptorBuilder<Id, Method, Uri> {
    id: Option<String>,
    method: Option<RestMethod>,
    uri: Option<String>,
    service: Option<String>,
    description: Option<String>,
    members: Vec<Member>,
    pagination: Option<Pagination>,
    _phantom: PhantomData<(Id, Method, Uri)>,
}

impl OperationDescriptorBuilder<Missing, Missing, Missing> {
    pub fn new() -> Self {
        Self {
            id: None,
            method: None,
            uri: None,
            service: None,
            description: None,
            members: Vec::new(),
            pagination: None,
            _phantom: PhantomData,
        }
    }
}

impl Default for OperationDescriptorBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, M, U> OperationDescriptorBuilder<I, M, U> {
    /// Moves every field into a builder with different state markers.
    fn transition<I2, M2, U2>(self) -> OperationDescriptorBuilder<I2, M2, U2> {
        OperationDescriptorBuilder {
            id: self.id,
            method: self.method,
            uri: self.uri,
            service: self.service,
            description: self.description,
            members: self.members,
            pagination: self.pagination,
            _phantom: PhantomData,
        }
    }

    /// Sets the service name (defaults to the lower-cased operation id).
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds one member binding.
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Adds several member bindings in order.
    pub fn members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
        self.members.extend(members);
        self
    }

    /// Marks the operation as paginated.
    pub fn paginated(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<M, U> OperationDescriptorBuilder<Missing, M, U> {
    /// Sets the operation id, validated on [`build`](OperationDescriptorBuilder::build).
    pub fn id(mut self, id: impl Into<String>) -> OperationDescriptorBuilder<Present, M, U> {
        self.id = Some(id.into());
        self.transition()
    }
}

impl<I, U> OperationDescriptorBuilder<I, Missing, U> {
    pub fn method(mut self, method: RestMethod) -> OperationDescriptorBuilder<I, Present, U> {
        self.method = Some(method);
        self.transition()
    }
}

impl<I, M> OperationDescriptorBuilder<I, M, Missing> {
    /// Sets the URI template, e.g. `/training-jobs/{trainingJobName}`.
    pub fn uri(mut self, uri: impl Into<String>) -> OperationDescriptorBuilder<I, M, Present> {
        self.uri = Some(uri.into());
        self.transition()
    }
}

impl OperationDescriptorBuilder<Present, Present, Present> {
    /// Validates and builds the descriptor.
    ///
    /// ## Errors
    ///
    /// - [`ConfigError::InvalidOperationId`] for a malformed id
    /// - [`ConfigError::DuplicateMember`] when two members share a name
    /// - [`ConfigError::InvalidPathTemplate`] when placeholders and `Path`
    ///   members disagree or braces are unbalanced
    /// - [`ConfigError::UnknownMember`] when pagination names an undeclared
    ///   request member
    pub fn build(self) -> Result<OperationDescriptor, ConfigError> {
        let id = OperationId::new(self.id.ok_or(ConfigError::missing_field("id"))?)?;
        let method = self.method.ok_or(ConfigError::missing_field("method"))?;
        let uri = self.uri.ok_or(ConfigError::missing_field("uri"))?;
        let input = Shape::new(format!("{id}Request"), self.members)?;

        let params = template_params(&uri)?;
        for param in &params {
            let bound = input
                .member(param)
                .is_some_and(|m| *m.location() == Location::Path);
            if !bound {
                return Err(ConfigError::invalid_path(format!(
                    "placeholder {{{param}}} in {uri} has no path member"
                )));
            }
        }
        if let Some(orphan) = input
            .members()
            .iter()
            .find(|m| *m.location() == Location::Path && !params.contains(&m.name()))
        {
            return Err(ConfigError::invalid_path(format!(
                "path member {} does not appear in {uri}",
                orphan.name()
            )));
        }

        if let Some(pagination) = &self.pagination {
            let declared = std::iter::once(&pagination.input_token)
                .chain(pagination.limit_key.as_ref())
                .find(|name| input.member(name).is_none());
            if let Some(name) = declared {
                return Err(ConfigError::UnknownMember {
                    operation: id.to_string(),
                    name: name.clone(),
                });
            }
        }

        let service = self
            .service
            .unwrap_or_else(|| id.as_str().to_ascii_lowercase());

        Ok(OperationDescriptor {
            id,
            service,
            method,
            uri,
            description: self.description,
            input,
            pagination: self.pagination,
        })
    }
}
