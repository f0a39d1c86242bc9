//! Per-request scope.
//!
//! Handlers record what they did (which resource kind, which action, and
//! the payload involved) into a [`RequestScope`] owned by the request. The
//! middleware creates the scope before the handler runs, then logs it and
//! copies a snapshot into the response extensions where outer layers can
//! read it.

use std::fmt;
use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

/// Action recorded by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Index or search.
    Search,
    /// Single record fetch.
    Read,
    /// Record creation.
    Create,
    /// Record replacement.
    Update,
    /// Record deletion.
    Delete,
}

impl Action {
    /// Returns the lowercase action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Search => "search",
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a handler did, recorded on success.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestScope {
    /// Resource kind name.
    pub resource: Option<String>,
    /// Action performed.
    pub action: Option<Action>,
    /// Records, a single record, or an id string, depending on the action.
    pub payload: Option<Value>,
}

impl RequestScope {
    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.resource.is_none() && self.action.is_none() && self.payload.is_none()
    }
}

/// Shared handle to the scope of the current request.
#[derive(Debug, Clone, Default)]
pub struct ScopeHandle(Arc<Mutex<RequestScope>>);

impl ScopeHandle {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful action.
    pub fn record(&self, resource: &str, action: Action, payload: Value) {
        let mut scope = self.0.lock();
        scope.resource = Some(resource.to_string());
        scope.action = Some(action);
        scope.payload = Some(payload);
    }

    /// Returns a copy of the current scope.
    pub fn snapshot(&self) -> RequestScope {
        self.0.lock().clone()
    }
}

/// Middleware that owns the request scope.
///
/// This can be used with `axum::middleware::from_fn`.
pub async fn request_scope_middleware(mut request: Request, next: Next) -> Response {
    let scope = ScopeHandle::new();
    request.extensions_mut().insert(scope.clone());

    let mut response = next.run(request).await;

    let snapshot = scope.snapshot();
    if !snapshot.is_empty() {
        debug!(
            resource = snapshot.resource.as_deref().unwrap_or_default(),
            action = snapshot.action.map(|a| a.as_str()).unwrap_or_default(),
            "Request scope recorded"
        );
    }
    response.extensions_mut().insert(snapshot);
    response
}
