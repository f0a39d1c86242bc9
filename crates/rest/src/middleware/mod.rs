//! HTTP middleware for the REST API.
//!
//! - [`scope`] - Per-request record of what the handler did
//! - [`panic`] - Panic to OperationOutcome translation
//! - [`content_type`] - JSON content type on every non-text response

pub mod content_type;
pub mod panic;
pub mod scope;

pub use content_type::json_content_type_middleware;
pub use panic::panic_response;
pub use scope::{Action, RequestScope, ScopeHandle, request_scope_middleware};
