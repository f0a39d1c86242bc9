//! Error types for the REST API.
//!
//! Every handler returns [`RestResult`]; the error side knows how to render
//! itself. Plain failures answer with a text body, search failures with the
//! OperationOutcome they carry, and unexpected failures with a synthetic
//! fatal OperationOutcome.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | Body |
//! |-------|-------------|------|
//! | InvalidId | 400 | `Invalid id` |
//! | DecodeFailure | 500 | decoder message |
//! | BadRequest | 400 | decoder message |
//! | Store | 500 | store error text |
//! | NotFound | 404 | store error text |
//! | UnknownResourceType | 404 | `Unknown resource type: <name>` |
//! | Hostname | 500 | failure text |
//! | Search | carried | carried OperationOutcome |
//! | Unexpected | 500 | `{severity: fatal, code: exception}` OperationOutcome |
//!
//! `BadRequest` and `NotFound` are only produced when strict status codes
//! are enabled; otherwise undecodable bodies and missing records surface as
//! `DecodeFailure` and `Store`.

use std::fmt;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use carebase_store::{InvalidIdError, SearchError, StorageError};

use crate::responses::headers::{LocationError, TEXT_CONTENT_TYPE, json_content_type};
use crate::responses::operation_outcome::{fatal_exception, search_rejected};

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Path id is not a canonical identifier (HTTP 400).
    InvalidId,

    /// Request body could not be decoded (HTTP 500).
    DecodeFailure {
        /// Decoder message.
        message: String,
    },

    /// Request body could not be decoded, strict mode (HTTP 400).
    BadRequest {
        /// Decoder message.
        message: String,
    },

    /// Document store failure (HTTP 500).
    Store(StorageError),

    /// Record does not exist, strict mode (HTTP 404).
    NotFound {
        /// Store message.
        message: String,
    },

    /// First path segment names no served resource kind (HTTP 404).
    UnknownResourceType {
        /// The requested type.
        resource_type: String,
    },

    /// `Location` header could not be built (HTTP 500).
    Hostname {
        /// Failure text.
        message: String,
    },

    /// Search compilation failed (carried status).
    Search(SearchError),

    /// Anything else (HTTP 500).
    Unexpected {
        /// Failure text, logged but not returned.
        message: String,
    },
}

impl RestError {
    /// Maps a store error, honouring strict status codes.
    pub fn from_store(err: StorageError, strict: bool) -> Self {
        if strict && err.is_not_found() {
            RestError::NotFound {
                message: err.to_string(),
            }
        } else {
            RestError::Store(err)
        }
    }

    /// Maps a body decode failure, honouring strict status codes.
    pub fn decode(message: impl Into<String>, strict: bool) -> Self {
        let message = message.into();
        if strict {
            RestError::BadRequest { message }
        } else {
            RestError::DecodeFailure { message }
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidId | RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound { .. } | RestError::UnknownResourceType { .. } => {
                StatusCode::NOT_FOUND
            }
            RestError::Search(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            RestError::DecodeFailure { .. }
            | RestError::Store(_)
            | RestError::Hostname { .. }
            | RestError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::InvalidId => write!(f, "Invalid id"),
            RestError::DecodeFailure { message } | RestError::BadRequest { message } => {
                write!(f, "{}", message)
            }
            RestError::Store(e) => write!(f, "{}", e),
            RestError::NotFound { message } => write!(f, "{}", message),
            RestError::UnknownResourceType { resource_type } => {
                write!(f, "Unknown resource type: {}", resource_type)
            }
            RestError::Hostname { message } => write!(f, "{}", message),
            RestError::Search(e) => write!(f, "{}", e),
            RestError::Unexpected { message } => write!(f, "Unexpected failure: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            RestError::Search(e) => {
                tracing::debug!(status = %status, error = %e, "Search rejected");
                let mut response = (status, Json(search_rejected(e))).into_response();
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, json_content_type());
                response
            }
            RestError::Unexpected { message } => {
                tracing::error!(error = %message, "Unexpected failure");
                let mut response = (status, Json(fatal_exception(None))).into_response();
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, json_content_type());
                response
            }
            _ => {
                if status.is_server_error() {
                    tracing::warn!(status = %status, error = %self, "Request failed");
                } else {
                    tracing::debug!(status = %status, error = %self, "Request rejected");
                }
                (
                    status,
                    [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
                    self.to_string(),
                )
                    .into_response()
            }
        }
    }
}

impl From<InvalidIdError> for RestError {
    fn from(_: InvalidIdError) -> Self {
        RestError::InvalidId
    }
}

impl From<SearchError> for RestError {
    fn from(err: SearchError) -> Self {
        RestError::Search(err)
    }
}

impl From<LocationError> for RestError {
    fn from(err: LocationError) -> Self {
        RestError::Hostname {
            message: err.to_string(),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
