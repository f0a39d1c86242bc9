//! Error types for the document store gateway.
//!
//! Store operations fail in one of two ways: the record-level outcome was
//! not what the caller asked for ([`ResourceError`]), or the backend itself
//! failed ([`BackendError`]). Both are wrapped in [`StorageError`].

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }

    /// Returns true if the error reports a duplicate key.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::Resource(ResourceError::AlreadyExists { .. })
        )
    }
}

/// Errors related to the state of a single record.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// No record with the requested id exists in the collection.
    #[error("not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A record with the given id already exists.
    #[error("duplicate key: {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "mongodb".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::bson::ser::Error> for StorageError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::bson::extjson::de::Error> for StorageError {
    fn from(err: mongodb::bson::extjson::de::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorageError::Resource(ResourceError::NotFound {
            collection: "relatedpersons".to_string(),
            id: "507f1f77bcf86cd799439011".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "not found: relatedpersons/507f1f77bcf86cd799439011"
        );
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_classification() {
        let err: StorageError = ResourceError::AlreadyExists {
            collection: "enrollmentrequests".to_string(),
            id: "abc".to_string(),
        }
        .into();
        assert!(err.is_conflict());
        assert!(err.to_string().contains("duplicate key"));
    }

    #[test]
    fn test_serde_error_becomes_backend_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::SerializationError { .. })
        ));
    }
}
