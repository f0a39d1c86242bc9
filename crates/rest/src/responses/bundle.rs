//! Bundle response building.
//!
//! Index results are wrapped in one of two envelopes:
//!
//! - **searchset**: a FHIR `Bundle` of type `searchset` with `total` and
//!   `entry[].resource`.
//! - **legacy**: `{id, type: "Bundle", title, updated, totalResults, entries}`
//!   with the bare resources in `entries`.
//!
//! Both carry a freshly generated id, and the count field always equals the
//! number of records returned.

use carebase_store::ResourceId;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

/// Index envelope style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStyle {
    /// FHIR searchset Bundle.
    Searchset,
    /// Pre-FHIR feed-style envelope.
    Legacy,
}

impl BundleStyle {
    /// Wraps `resources` of kind `resource_type` in this envelope.
    pub fn build(&self, resource_type: &str, resources: Vec<Value>) -> Value {
        match self {
            BundleStyle::Searchset => searchset_bundle(resources),
            BundleStyle::Legacy => legacy_bundle(resource_type, resources),
        }
    }
}

/// Builds a FHIR searchset Bundle.
pub fn searchset_bundle(resources: Vec<Value>) -> Value {
    let total = resources.len();
    let entries: Vec<Value> = resources
        .into_iter()
        .map(|resource| json!({ "resource": resource }))
        .collect();

    json!({
        "resourceType": "Bundle",
        "id": ResourceId::generate().to_hex(),
        "type": "searchset",
        "total": total,
        "entry": entries
    })
}

/// Builds the legacy index envelope.
pub fn legacy_bundle(resource_type: &str, resources: Vec<Value>) -> Value {
    json!({
        "id": ResourceId::generate().to_hex(),
        "type": "Bundle",
        "title": format!("{} Index", resource_type),
        "updated": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "totalResults": resources.len(),
        "entries": resources
    })
}
