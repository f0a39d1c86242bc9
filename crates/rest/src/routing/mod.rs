//! Route configuration for the REST API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod fhir_routes;

pub use fhir_routes::create_routes;
