//! Axum extractors.
//!
//! - [`ResourceBody`] - A request body decoded into a JSON object

mod resource_body;

pub use resource_body::{ResourceBody, decode_object};
