//! Response building for the REST API.
//!
//! - [`operation_outcome`] - OperationOutcome generation
//! - [`bundle`] - Searchset and legacy index envelopes
//! - [`headers`] - Content types and the `Location` header

pub mod bundle;
pub mod headers;
pub mod operation_outcome;

pub use bundle::BundleStyle;
