//! Delete interaction handler.
//!
//! `DELETE [base]/[type]/[id]`

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carebase_store::{ResourceId, core::DocumentStore};
use serde_json::Value;
use tracing::debug;

use crate::error::RestResult;
use crate::middleware::scope::{Action, ScopeHandle};
use crate::state::AppState;

/// Handler for the delete interaction.
///
/// Deletes are hard; nothing of the record is kept.
///
/// # Response
///
/// - `200 OK` - Empty body
/// - `400 Bad Request` - Malformed id
/// - `500 Internal Server Error` - Store failure, including an unknown id
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
    Extension(scope): Extension<ScopeHandle>,
) -> RestResult<Response>
where
    S: DocumentStore + 'static,
{
    debug!(resource_type = %resource_type, id = %id, "Processing delete request");

    let repository = state.repository(&resource_type)?;
    let id = ResourceId::parse(&id)?;
    repository.delete(&id).await?;

    scope.record(repository.kind().name, Action::Delete, Value::String(id.to_hex()));

    Ok(StatusCode::OK.into_response())
}
