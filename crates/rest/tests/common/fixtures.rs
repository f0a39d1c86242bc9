//! Test data fixtures and test stores.

use async_trait::async_trait;
use carebase_store::core::DocumentStore;
use carebase_store::error::{BackendError, StorageResult};
use carebase_store::{CompiledQuery, ResourceId};
use serde_json::{Value, json};

/// An EnrollmentRequest body.
pub fn enrollment_request(status: &str) -> Value {
    json!({
        "resourceType": "EnrollmentRequest",
        "status": status,
        "created": "2021-03-15T09:30:00Z",
        "candidate": {"reference": "Patient/pat-1"},
        "insurer": {"reference": "Organization/org-7"},
        "identifier": [{"system": "urn:carebase:enrollment", "value": "ENR-1"}]
    })
}

/// An EnrollmentRequest with a given candidate and creation date.
pub fn enrollment_for(patient: &str, created: &str) -> Value {
    json!({
        "resourceType": "EnrollmentRequest",
        "status": "active",
        "created": created,
        "candidate": {"reference": format!("Patient/{}", patient)}
    })
}

/// A RelatedPerson body.
pub fn related_person(family: &str, gender: &str) -> Value {
    json!({
        "resourceType": "RelatedPerson",
        "active": true,
        "patient": {"reference": "Patient/pat-1"},
        "name": [{"family": family, "given": ["Ana"]}],
        "gender": gender,
        "birthDate": "1980-06-01"
    })
}

/// An OperationOutcome body.
pub fn operation_outcome(severity: &str, code: &str) -> Value {
    json!({
        "resourceType": "OperationOutcome",
        "issue": [{"severity": severity, "code": code, "diagnostics": "seeded"}]
    })
}

/// Payloads of every served kind, for property loops.
pub fn payloads() -> Vec<(&'static str, Value)> {
    vec![
        ("EnrollmentRequest", enrollment_request("active")),
        ("EnrollmentRequest", json!({"status": "draft"})),
        ("OperationOutcome", operation_outcome("warning", "processing")),
        ("RelatedPerson", related_person("Fernández", "female")),
        ("RelatedPerson", json!({"gender": "unknown", "telecom": []})),
    ]
}

/// A store whose every call panics.
pub struct PanickingStore;

#[async_trait]
impl DocumentStore for PanickingStore {
    fn backend_name(&self) -> &'static str {
        "panicking"
    }

    async fn list(&self, _collection: &str, _limit: usize) -> StorageResult<Vec<Value>> {
        panic!("list exploded")
    }

    async fn find(&self, _collection: &str, _id: &ResourceId) -> StorageResult<Value> {
        panic!("find exploded")
    }

    async fn insert(&self, _collection: &str, _id: &ResourceId, _doc: Value) -> StorageResult<()> {
        panic!("insert exploded")
    }

    async fn replace(&self, _collection: &str, _id: &ResourceId, _doc: Value) -> StorageResult<()> {
        panic!("replace exploded")
    }

    async fn remove(&self, _collection: &str, _id: &ResourceId) -> StorageResult<()> {
        panic!("remove exploded")
    }

    async fn search(&self, _collection: &str, _query: &CompiledQuery) -> StorageResult<Vec<Value>> {
        panic!("search exploded")
    }

    async fn count(&self, _collection: &str) -> StorageResult<u64> {
        panic!("count exploded")
    }
}

/// A store whose every call fails with a backend error.
pub struct FailingStore;

fn unavailable<T>() -> StorageResult<T> {
    Err(BackendError::ConnectionFailed {
        backend_name: "failing".to_string(),
        message: "connection refused".to_string(),
    }
    .into())
}

#[async_trait]
impl DocumentStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn list(&self, _collection: &str, _limit: usize) -> StorageResult<Vec<Value>> {
        unavailable()
    }

    async fn find(&self, _collection: &str, _id: &ResourceId) -> StorageResult<Value> {
        unavailable()
    }

    async fn insert(&self, _collection: &str, _id: &ResourceId, _doc: Value) -> StorageResult<()> {
        unavailable()
    }

    async fn replace(&self, _collection: &str, _id: &ResourceId, _doc: Value) -> StorageResult<()> {
        unavailable()
    }

    async fn remove(&self, _collection: &str, _id: &ResourceId) -> StorageResult<()> {
        unavailable()
    }

    async fn search(&self, _collection: &str, _query: &CompiledQuery) -> StorageResult<Vec<Value>> {
        unavailable()
    }

    async fn count(&self, _collection: &str) -> StorageResult<u64> {
        unavailable()
    }
}
