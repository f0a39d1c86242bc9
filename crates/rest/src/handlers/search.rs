//! Index interaction handler.
//!
//! `GET [base]/[type]` with optional search parameters.

use axum::{
    Extension, Json,
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Response},
};
use carebase_store::core::DocumentStore;
use serde_json::Value;
use tracing::debug;

use crate::error::RestResult;
use crate::middleware::scope::{Action, ScopeHandle};
use crate::state::AppState;

/// Handler for the index interaction.
///
/// Without search parameters, or for kinds that do not accept search, the
/// first `index_limit` records are returned. Otherwise the query is compiled
/// against the search parameter registry and run against the collection.
///
/// # Response
///
/// - `200 OK` - A searchset or legacy Bundle, depending on the kind
/// - `400 Bad Request` - Unknown parameter, unsupported modifier or bad value
/// - `500 Internal Server Error` - Store failure
///
/// # Example
///
/// ```http
/// GET /EnrollmentRequest?status=active&_count=10 HTTP/1.1
/// ```
pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource_type): Path<String>,
    RawQuery(query): RawQuery,
    Extension(scope): Extension<ScopeHandle>,
) -> RestResult<Response>
where
    S: DocumentStore + 'static,
{
    debug!(
        resource_type = %resource_type,
        query = ?query,
        "Processing index request"
    );

    let repository = state.repository(&resource_type)?;
    let resources = repository
        .index(
            query.as_deref(),
            state.config().index_limit,
            state.search_registry(),
            state.config().search_limits(),
        )
        .await?;

    debug!(
        resource_type = %resource_type,
        count = resources.len(),
        "Returning index"
    );

    let kind = repository.kind();
    scope.record(kind.name, Action::Search, Value::Array(resources.clone()));

    Ok(Json(kind.bundle_style.build(kind.name, resources)).into_response())
}
