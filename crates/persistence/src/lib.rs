//! Carebase Document Store
//!
//! This crate provides the storage side of the Carebase FHIR service: the
//! document store gateway, resource identifiers, and the search compiler
//! that turns URL query strings into backend-evaluable queries.
//!
//! # Features
//!
//! - **Document store gateway**: CRUD and search over named JSON collections
//! - **Identifiers**: 12-byte time-ordered ids rendered as 24 hex characters
//! - **Search**: token, string, reference and date parameters with modifiers
//!
//! # Backend Features
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | (always) | Process-local store, used for development and tests |
//! | MongoDB | `mongodb` | Official driver, one MongoDB collection per resource kind |
//!
//! ```toml
//! [dependencies]
//! carebase-store = { version = "0.1", features = ["mongodb"] }
//! ```
//!
//! # Architecture
//!
//! - [`id`] - Resource identifiers
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`DocumentStore`](core::DocumentStore) trait
//! - [`search`] - Search parameter registry and query compiler
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use carebase_store::backends::MemoryBackend;
//! use carebase_store::core::DocumentStore;
//! use carebase_store::id::ResourceId;
//! use carebase_store::search::{SearchLimits, SearchParameterRegistry, SearchQuery};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryBackend::new();
//! let id = ResourceId::generate();
//! store
//!     .insert(
//!         "enrollmentrequests",
//!         &id,
//!         json!({"resourceType": "EnrollmentRequest", "id": id.to_string(), "status": "active"}),
//!     )
//!     .await
//!     .unwrap();
//!
//! let query = SearchQuery::new("EnrollmentRequest", "status=active")
//!     .compile(&SearchParameterRegistry::with_builtin(), SearchLimits::default())
//!     .unwrap();
//! let found = store.search("enrollmentrequests", &query).await.unwrap();
//! assert_eq!(found.len(), 1);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod id;
pub mod search;

// Re-export commonly used types at crate root
pub use core::DocumentStore;
pub use error::{BackendError, ResourceError, StorageError, StorageResult};
pub use id::{InvalidIdError, ResourceId};
pub use search::{CompiledQuery, SearchError, SearchQuery};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
