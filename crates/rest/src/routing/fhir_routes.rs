//! FHIR route configuration.
//!
//! Defines all routes for the REST API.

use axum::{
    Router,
    routing::get,
};
use carebase_store::core::DocumentStore;

use crate::handlers;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// The resource type is a path parameter; requests naming a type that is not
/// served are answered with `404 Not Found` by the handlers.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Type-level
/// - `GET /{type}` - Index / search
/// - `POST /{type}` - Create
///
/// ## Instance-level
/// - `GET /{type}/{id}` - Read
/// - `PUT /{type}/{id}` - Update
/// - `DELETE /{type}/{id}` - Delete
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        // Type-level routes
        .route(
            "/{resource_type}",
            get(handlers::search_handler::<S>).post(handlers::create_handler::<S>),
        )
        // Instance-level routes
        .route(
            "/{resource_type}/{id}",
            get(handlers::read_handler::<S>)
                .put(handlers::update_handler::<S>)
                .delete(handlers::delete_handler::<S>),
        )
        .with_state(state)
}
