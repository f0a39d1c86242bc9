//! # carebase-rest - FHIR REST service
//!
//! HTTP surface for three FHIR resource kinds, `EnrollmentRequest`,
//! `OperationOutcome` and `RelatedPerson`, stored as JSON documents in a
//! [`DocumentStore`](carebase_store::core::DocumentStore).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carebase_rest::{ServerConfig, create_app_with_config};
//! use carebase_store::backends::MemoryBackend;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let addr = config.socket_addr();
//!     let app = create_app_with_config(MemoryBackend::new(), config);
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern | Success |
//! |------------|-------------|-------------|---------|
//! | index / search | GET | `/[type]?params` | 200 Bundle |
//! | read | GET | `/[type]/[id]` | 200 record |
//! | create | POST | `/[type]` | 201 record or 200 empty, `Location` |
//! | update | PUT | `/[type]/[id]` | 200 record or 200 empty |
//! | delete | DELETE | `/[type]/[id]` | 200 empty |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` | 200 |
//!
//! Ids are 24 character lowercase hex strings assigned by the server.
//! `EnrollmentRequest` indexes come back as `searchset` Bundles and accept
//! search parameters; the other two kinds use the legacy index envelope and
//! ignore the query string.
//!
//! ## Responses
//!
//! - Every response carries `Access-Control-Allow-Origin: *`.
//! - Every response except plain-text errors is labelled
//!   `application/json; charset=utf-8`.
//! - Malformed ids answer `400 Invalid id`; store failures answer 500 with
//!   the error text. Search errors answer with an OperationOutcome and the
//!   status they carry. Panics answer 500 with a fatal OperationOutcome.
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`kind`] - Per-kind descriptors
//! - [`repository`] - Store access for one kind
//! - [`state`] - Application state (storage, configuration, kinds)
//! - [`handlers`] - HTTP request handlers for each interaction
//! - [`middleware`] - Request scope, panic recovery, content type
//! - [`extractors`] - Request body decoding
//! - [`responses`] - Bundles, OperationOutcomes and headers
//! - [`routing`] - Route configuration
//! - [`error`] - Error types and their responses

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod kind;
pub mod middleware;
pub mod repository;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendKind};
pub use error::{RestError, RestResult};
pub use kind::{CreateStyle, ResourceKind, ResourceKinds};
pub use middleware::scope::{Action, RequestScope, ScopeHandle};
pub use repository::Repository;
pub use state::AppState;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode, header},
    middleware::{from_fn, map_response},
};
use carebase_store::core::DocumentStore;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::middleware::{
    json_content_type_middleware, panic_response, request_scope_middleware,
};

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: DocumentStore + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust
/// use carebase_rest::{ServerConfig, create_app_with_config};
/// use carebase_store::backends::MemoryBackend;
///
/// let config = ServerConfig {
///     public_host: Some("fhir.example.org".to_string()),
///     strict_status_codes: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(MemoryBackend::new(), config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: DocumentStore + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    create_app_with_state(AppState::new(Arc::new(storage), config))
}

/// Creates the Axum application around an existing state.
pub fn create_app_with_state<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + 'static,
{
    let config = state.config().clone();
    let router = routing::fhir_routes::create_routes(state);

    // Innermost first: the scope sees only handler output, panics are
    // turned into responses before the timeout and header layers run.
    let router = router
        .layer(from_fn(request_scope_middleware))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer())
    } else {
        router
    };

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(map_response(json_content_type_middleware));

    router.layer(service_builder)
}

/// Builds the CORS layer answering preflight requests.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "carebase_rest={level},carebase_store={level},carebase_server={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
