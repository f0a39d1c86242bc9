//! Create interaction handler.
//!
//! `POST [base]/[type]`

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use carebase_store::ResourceId;
use carebase_store::core::DocumentStore;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::ResourceBody;
use crate::kind::CreateStyle;
use crate::middleware::scope::{Action, ScopeHandle};
use crate::responses::headers::{location_url, resolve_host};
use crate::state::AppState;

/// Handler for the create interaction.
///
/// The server assigns the id; any `id` or `resourceType` in the body is
/// overwritten. The `Location` header points at
/// `http://<host>:<location port>/<type>/<id>`.
///
/// # Response
///
/// - `201 Created` with the stored record, for kinds that answer with a body
/// - `200 OK` with an empty body, for the others
/// - `500 Internal Server Error` - Undecodable body (`400` with strict status
///   codes), store failure or host name lookup failure
///
/// # Example
///
/// ```http
/// POST /EnrollmentRequest HTTP/1.1
/// Content-Type: application/json
///
/// {"status": "active", "candidate": {"reference": "Patient/pat-1"}}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource_type): Path<String>,
    Extension(scope): Extension<ScopeHandle>,
    body: Bytes,
) -> RestResult<Response>
where
    S: DocumentStore + 'static,
{
    debug!(resource_type = %resource_type, "Processing create request");

    let repository = state.repository(&resource_type)?;
    let resource = ResourceBody::from_bytes(&body, state.config().strict_status_codes)?;

    // Built before the insert; a Location failure stores nothing.
    let kind = repository.kind();
    let id = ResourceId::generate();
    let host = resolve_host(state.config().public_host.as_deref())?;
    let location = location_url(&host, kind.location_port, kind.name, &id.to_hex())?;

    let stored = repository.create(&id, resource.into_inner()).await?;

    debug!(
        resource_type = %resource_type,
        id = %id,
        location = %location,
        "Resource created"
    );

    scope.record(kind.name, Action::Create, stored.clone());

    let response = match kind.create_style {
        CreateStyle::CreatedWithBody => {
            (StatusCode::CREATED, [(header::LOCATION, location)], Json(stored)).into_response()
        }
        CreateStyle::LocationOnly => (StatusCode::OK, [(header::LOCATION, location)]).into_response(),
    };

    Ok(response)
}
