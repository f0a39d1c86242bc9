//! HTTP request handlers.
//!
//! Every served resource kind shares the same handlers; per-kind behaviour
//! comes from its [`ResourceKind`](crate::kind::ResourceKind) descriptor.
//!
//! - [`search`] - Index and search a collection
//! - [`read`] - Read a record by id
//! - [`create`] - Create a record
//! - [`update`] - Replace a record
//! - [`delete`] - Delete a record
//! - [`health`] - Health, liveness and readiness probes

pub mod create;
pub mod delete;
pub mod health;
pub mod read;
pub mod search;
pub mod update;

pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use read::read_handler;
pub use search::search_handler;
pub use update::update_handler;
