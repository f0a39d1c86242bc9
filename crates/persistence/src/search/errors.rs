//! Search compilation errors.
//!
//! A [`SearchError`] carries the status code the HTTP layer answers with;
//! its message becomes the OperationOutcome issue text.

use thiserror::Error;

/// Error raised while compiling a raw query string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The resource type has no registered search parameters.
    #[error("unsupported resource type for search: {resource_type}")]
    UnsupportedResourceType {
        /// The resource type that was searched.
        resource_type: String,
    },

    /// The parameter is not defined for the resource type.
    #[error("unknown search parameter '{parameter}' for {resource_type}")]
    UnknownParameter {
        /// The resource type that was searched.
        resource_type: String,
        /// The offending parameter name.
        parameter: String,
    },

    /// The modifier is not valid for the parameter.
    #[error("unsupported modifier ':{modifier}' on search parameter '{parameter}'")]
    UnsupportedModifier {
        /// The parameter name.
        parameter: String,
        /// The modifier as written.
        modifier: String,
    },

    /// The parameter value could not be interpreted.
    #[error("invalid value '{value}' for search parameter '{parameter}': {message}")]
    InvalidValue {
        /// The parameter name.
        parameter: String,
        /// The value as written.
        value: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl SearchError {
    /// HTTP status to answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            SearchError::UnsupportedResourceType { .. } => 404,
            SearchError::UnknownParameter { .. }
            | SearchError::UnsupportedModifier { .. }
            | SearchError::InvalidValue { .. } => 400,
        }
    }
}

/// Result type alias for search compilation.
pub type SearchResult<T> = Result<T, SearchError>;
