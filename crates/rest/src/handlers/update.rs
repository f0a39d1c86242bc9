//! Update interaction handler.
//!
//! `PUT [base]/[type]/[id]`

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carebase_store::{ResourceId, core::DocumentStore};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::ResourceBody;
use crate::middleware::scope::{Action, ScopeHandle};
use crate::state::AppState;

/// Handler for the update interaction.
///
/// Replaces the whole record. The id in the path wins over any id in the
/// body. The id is checked before the body is decoded.
///
/// # Response
///
/// - `200 OK` - With the stored record for kinds that echo updates, empty
///   otherwise
/// - `400 Bad Request` - Malformed id
/// - `500 Internal Server Error` - Undecodable body or store failure,
///   including an unknown id
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
    Extension(scope): Extension<ScopeHandle>,
    body: Bytes,
) -> RestResult<Response>
where
    S: DocumentStore + 'static,
{
    debug!(resource_type = %resource_type, id = %id, "Processing update request");

    let repository = state.repository(&resource_type)?;
    let id = ResourceId::parse(&id)?;
    let resource = ResourceBody::from_bytes(&body, state.config().strict_status_codes)?;

    if let Some(body_id) = resource.id().filter(|body_id| *body_id != id.to_hex()) {
        debug!(path_id = %id, body_id = %body_id, "Ignoring id in body");
    }

    let stored = repository.update(&id, resource.into_inner()).await?;

    let kind = repository.kind();
    scope.record(kind.name, Action::Update, stored.clone());

    if kind.echo_update {
        Ok(Json(stored).into_response())
    } else {
        Ok(StatusCode::OK.into_response())
    }
}
