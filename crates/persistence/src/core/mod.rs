//! Core storage traits.
//!
//! - [`DocumentStore`] - CRUD and search over named JSON collections

mod store;

pub use store::DocumentStore;
