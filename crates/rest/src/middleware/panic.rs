//! Panic recovery.
//!
//! Installed on every route through `tower_http::catch_panic`. A panic in a
//! handler becomes a 500 with the synthetic fatal OperationOutcome instead
//! of a dropped connection.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::RestError;

/// Converts a panic payload into a response.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    RestError::Unexpected { message }.into_response()
}
