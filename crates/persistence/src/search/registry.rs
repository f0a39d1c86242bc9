//! Search parameter registry.
//!
//! The registry holds the search parameters each resource type accepts,
//! indexed by `(resource_type, code)`. Paths are dot-separated element
//! names; arrays met along the way are traversed transparently, so
//! `issue.severity` reaches the severity of every issue.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::params::SearchParamType;

/// Parameters every resource type accepts.
const COMMON_PARAMS: &[(&str, SearchParamType, &[&str])] =
    &[("_id", SearchParamType::Token, &["id"])];

const ENROLLMENT_REQUEST_PARAMS: &[(&str, SearchParamType, &[&str])] = &[
    ("identifier", SearchParamType::Token, &["identifier"]),
    ("status", SearchParamType::Token, &["status"]),
    ("subject", SearchParamType::Reference, &["candidate", "subject"]),
    ("patient", SearchParamType::Reference, &["candidate", "subject"]),
    ("organization", SearchParamType::Reference, &["insurer", "organization"]),
    ("provider", SearchParamType::Reference, &["provider"]),
    ("created", SearchParamType::Date, &["created"]),
];

const RELATED_PERSON_PARAMS: &[(&str, SearchParamType, &[&str])] = &[
    ("identifier", SearchParamType::Token, &["identifier"]),
    ("patient", SearchParamType::Reference, &["patient"]),
    ("name", SearchParamType::String, &["name"]),
    ("gender", SearchParamType::Token, &["gender"]),
    ("birthdate", SearchParamType::Date, &["birthDate"]),
    ("address", SearchParamType::String, &["address"]),
    ("telecom", SearchParamType::Token, &["telecom"]),
];

const OPERATION_OUTCOME_PARAMS: &[(&str, SearchParamType, &[&str])] = &[
    ("severity", SearchParamType::Token, &["issue.severity"]),
    ("code", SearchParamType::Token, &["issue.code"]),
];

/// Definition of one search parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameterDefinition {
    /// Parameter code as it appears in the query string.
    pub code: String,

    /// The parameter type.
    pub param_type: SearchParamType,

    /// Element paths whose values the parameter matches against.
    pub paths: Vec<String>,
}

impl SearchParameterDefinition {
    /// Creates a definition.
    pub fn new(code: impl Into<String>, param_type: SearchParamType, paths: &[&str]) -> Self {
        Self {
            code: code.into(),
            param_type,
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Registry of search parameters per resource type.
#[derive(Debug, Clone, Default)]
pub struct SearchParameterRegistry {
    by_type: HashMap<String, HashMap<String, SearchParameterDefinition>>,
}

impl SearchParameterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the parameters of the built-in resource types.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_type("EnrollmentRequest", ENROLLMENT_REQUEST_PARAMS);
        registry.register_type("RelatedPerson", RELATED_PERSON_PARAMS);
        registry.register_type("OperationOutcome", OPERATION_OUTCOME_PARAMS);
        registry
    }

    fn register_type(
        &mut self,
        resource_type: &str,
        params: &[(&str, SearchParamType, &[&str])],
    ) {
        for (code, param_type, paths) in COMMON_PARAMS.iter().chain(params) {
            self.register(
                resource_type,
                SearchParameterDefinition::new(*code, *param_type, paths),
            );
        }
    }

    /// Adds or replaces a parameter for a resource type.
    pub fn register(&mut self, resource_type: &str, definition: SearchParameterDefinition) {
        self.by_type
            .entry(resource_type.to_string())
            .or_default()
            .insert(definition.code.clone(), definition);
    }

    /// Returns true if the resource type has any registered parameters.
    pub fn supports(&self, resource_type: &str) -> bool {
        self.by_type.contains_key(resource_type)
    }

    /// Looks up a parameter by resource type and code.
    pub fn get(&self, resource_type: &str, code: &str) -> Option<&SearchParameterDefinition> {
        self.by_type.get(resource_type)?.get(code)
    }

    /// Returns the parameter codes registered for a resource type, sorted.
    pub fn codes(&self, resource_type: &str) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .by_type
            .get(resource_type)
            .map(|params| params.keys().map(String::as_str).collect())
            .unwrap_or_default();
        codes.sort_unstable();
        codes
    }
}
