//! Resource kind descriptors.
//!
//! The three resource kinds share one set of handlers. What differs between
//! them is captured here as data: the collection they live in, the port
//! written into `Location` headers, the index envelope, whether the index
//! accepts search parameters, and how create and update answer.

use std::collections::HashMap;

use crate::config::ServerConfig;
use crate::responses::bundle::BundleStyle;

/// How a successful create is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStyle {
    /// `201 Created`, `Location` header, the stored record as body.
    CreatedWithBody,
    /// `200 OK`, `Location` header, no body.
    LocationOnly,
}

/// Runtime descriptor of a resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKind {
    /// Resource type name, also the first path segment.
    pub name: &'static str,
    /// Document store collection.
    pub collection: &'static str,
    /// Port written into `Location` headers.
    pub location_port: u16,
    /// Envelope used by the index route.
    pub bundle_style: BundleStyle,
    /// Whether the index route accepts search parameters.
    pub search_enabled: bool,
    /// How create answers.
    pub create_style: CreateStyle,
    /// Whether update echoes the stored record.
    pub echo_update: bool,
}

impl ResourceKind {
    /// EnrollmentRequest: searchable, 201 with body on create, echoes updates.
    pub fn enrollment_request(location_port: u16) -> Self {
        Self {
            name: "EnrollmentRequest",
            collection: "enrollmentrequests",
            location_port,
            bundle_style: BundleStyle::Searchset,
            search_enabled: true,
            create_style: CreateStyle::CreatedWithBody,
            echo_update: true,
        }
    }

    /// OperationOutcome: legacy index, bare create and update.
    pub fn operation_outcome(location_port: u16) -> Self {
        Self {
            name: "OperationOutcome",
            collection: "operationoutcomes",
            location_port,
            bundle_style: BundleStyle::Legacy,
            search_enabled: false,
            create_style: CreateStyle::LocationOnly,
            echo_update: false,
        }
    }

    /// RelatedPerson: legacy index, bare create and update.
    pub fn related_person(location_port: u16) -> Self {
        Self {
            name: "RelatedPerson",
            collection: "relatedpersons",
            location_port,
            bundle_style: BundleStyle::Legacy,
            search_enabled: false,
            create_style: CreateStyle::LocationOnly,
            echo_update: false,
        }
    }
}

/// The resource kinds served by one application, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ResourceKinds {
    by_name: HashMap<&'static str, ResourceKind>,
}

impl ResourceKinds {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The three built-in kinds with ports taken from configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        let mut kinds = Self::new();
        kinds.insert(ResourceKind::enrollment_request(
            config.enrollment_request_port,
        ));
        kinds.insert(ResourceKind::operation_outcome(
            config.operation_outcome_port,
        ));
        kinds.insert(ResourceKind::related_person(config.related_person_port));
        kinds
    }

    /// Adds or replaces a kind.
    pub fn insert(&mut self, kind: ResourceKind) {
        self.by_name.insert(kind.name, kind);
    }

    /// Looks up a kind by resource type name.
    pub fn get(&self, name: &str) -> Option<&ResourceKind> {
        self.by_name.get(name)
    }

    /// Returns the kinds sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceKind> {
        let mut kinds: Vec<_> = self.by_name.values().collect();
        kinds.sort_by_key(|k| k.name);
        kinds.into_iter()
    }
}
