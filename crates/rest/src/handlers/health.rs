//! Health check endpoint handlers.
//!
//! Probes for monitoring systems and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carebase_store::core::DocumentStore;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: DocumentStore + 'static,
{
    debug!("Processing health check request");

    let health_response = json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Counts every served collection; any store failure makes the service
/// unready.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - `{status: "ready", backend, collections: {<name>: <count>}}`
/// - `503 Service Unavailable` - The store could not be queried
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: DocumentStore + 'static,
{
    debug!("Processing readiness check request");

    let backend = state.storage().backend_name();
    let mut collections = Map::new();

    for kind in state.kinds().iter() {
        match state.storage().count(kind.collection).await {
            Ok(count) => {
                collections.insert(kind.collection.to_string(), Value::from(count));
            }
            Err(e) => {
                warn!(collection = kind.collection, error = %e, "Readiness check failed");
                let response = json!({
                    "status": "unavailable",
                    "backend": backend,
                    "error": e.to_string()
                });
                return (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response();
            }
        }
    }

    let response = json!({
        "status": "ready",
        "backend": backend,
        "collections": collections
    });

    (StatusCode::OK, Json(response)).into_response()
}
