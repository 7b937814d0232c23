//! HTTP methods used by operation descriptors.

use strum::{Display, EnumIter, EnumString};

/// HTTP method of an operation.
///
/// ## Examples
///
/// ```rust
/// use mlsdk_core::RestMethod;
///
/// let method: RestMethod = "POST".parse().unwrap();
/// assert!(method.has_body());
/// assert!(!method.is_idempotent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl RestMethod {
    /// Returns `true` if requests with this method always carry a JSON body.
    ///
    /// Other methods only carry a body when body members are set.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns `true` if repeating the request has the same effect as sending it once.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Self::Post | Self::Patch)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}
