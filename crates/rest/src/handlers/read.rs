//! Read interaction handler.
//!
//! `GET [base]/[type]/[id]`

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use carebase_store::{ResourceId, core::DocumentStore};
use tracing::debug;

use crate::error::RestResult;
use crate::middleware::scope::{Action, ScopeHandle};
use crate::state::AppState;

/// Handler for the read interaction.
///
/// # Response
///
/// - `200 OK` - The stored record
/// - `400 Bad Request` - The id is not a 24 character hex string
/// - `500 Internal Server Error` - Store failure, including a missing record
///   (`404 Not Found` with strict status codes)
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
    Extension(scope): Extension<ScopeHandle>,
) -> RestResult<Response>
where
    S: DocumentStore + 'static,
{
    debug!(resource_type = %resource_type, id = %id, "Processing read request");

    let repository = state.repository(&resource_type)?;
    let id = ResourceId::parse(&id)?;
    let resource = repository.show(&id).await?;

    scope.record(repository.kind().name, Action::Read, resource.clone());

    Ok(Json(resource).into_response())
}
