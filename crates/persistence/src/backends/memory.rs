//! In-memory backend.
//!
//! Documents live in per-collection ordered maps behind a single
//! `parking_lot::RwLock`. Insertion order is tracked with a monotonically
//! increasing sequence number, so listing and searching return documents in
//! the order they were first inserted. Replacing a document keeps its slot.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::core::DocumentStore;
use crate::error::{ResourceError, StorageResult};
use crate::id::ResourceId;
use crate::search::CompiledQuery;

#[derive(Default)]
struct Collection {
    next_seq: u64,
    slots: HashMap<ResourceId, u64>,
    documents: BTreeMap<u64, Value>,
}

impl Collection {
    fn get(&self, id: &ResourceId) -> Option<&Value> {
        self.slots.get(id).and_then(|seq| self.documents.get(seq))
    }
}

/// Process-local document store.
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Collection>>,
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let collections = self.collections.read();
        f.debug_struct("MemoryBackend")
            .field("collections", &collections.len())
            .finish_non_exhaustive()
    }
}

impl MemoryBackend {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(collection: &str, id: &ResourceId) -> ResourceError {
    ResourceError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, collection: &str, limit: usize) -> StorageResult<Vec<Value>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|c| c.documents.values().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn find(&self, collection: &str, id: &ResourceId) -> StorageResult<Value> {
        let collections = self.collections.read();
        collections
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
            .ok_or_else(|| not_found(collection, id).into())
    }

    async fn insert(
        &self,
        collection: &str,
        id: &ResourceId,
        document: Value,
    ) -> StorageResult<()> {
        let mut collections = self.collections.write();
        let entry = collections.entry(collection.to_string()).or_default();

        if entry.slots.contains_key(id) {
            return Err(ResourceError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into());
        }

        let seq = entry.next_seq;
        entry.next_seq += 1;
        entry.slots.insert(*id, seq);
        entry.documents.insert(seq, document);

        tracing::debug!(collection, %id, "Inserted document");
        Ok(())
    }

    async fn replace(
        &self,
        collection: &str,
        id: &ResourceId,
        document: Value,
    ) -> StorageResult<()> {
        let mut collections = self.collections.write();
        let slot = collections
            .get_mut(collection)
            .and_then(|c| {
                let seq = *c.slots.get(id)?;
                c.documents.get_mut(&seq)
            })
            .ok_or_else(|| not_found(collection, id))?;

        *slot = document;
        tracing::debug!(collection, %id, "Replaced document");
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &ResourceId) -> StorageResult<()> {
        let mut collections = self.collections.write();
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let seq = entry
            .slots
            .remove(id)
            .ok_or_else(|| not_found(collection, id))?;
        entry.documents.remove(&seq);

        tracing::debug!(collection, %id, "Removed document");
        Ok(())
    }

    async fn search(&self, collection: &str, query: &CompiledQuery) -> StorageResult<Vec<Value>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|c| {
                c.documents
                    .values()
                    .filter(|doc| query.matches(doc))
                    .take(query.limit())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str) -> StorageResult<u64> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|c| c.documents.len() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const COLLECTION: &str = "operationoutcomes";

    fn outcome(id: &ResourceId, severity: &str) -> Value {
        json!({
            "resourceType": "OperationOutcome",
            "id": id.to_string(),
            "issue": [{ "severity": severity, "code": "processing" }]
        })
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryBackend::new();
        let id = ResourceId::generate();
        store
            .insert(COLLECTION, &id, outcome(&id, "error"))
            .await
            .unwrap();

        let doc = store.find(COLLECTION, &id).await.unwrap();
        assert_eq!(doc["id"], id.to_string());
        assert_eq!(store.count(COLLECTION).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let store = MemoryBackend::new();
        let id = ResourceId::generate();
        store
            .insert(COLLECTION, &id, outcome(&id, "error"))
            .await
            .unwrap();

        let err = store
            .insert(COLLECTION, &id, outcome(&id, "fatal"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            store.find(COLLECTION, &id).await.unwrap()["issue"][0]["severity"],
            "error"
        );
    }

    #[tokio::test]
    async fn test_replace_keeps_insertion_slot() {
        let store = MemoryBackend::new();
        let ids: Vec<_> = (0..3).map(|_| ResourceId::generate()).collect();
        for id in &ids {
            store
                .insert(COLLECTION, id, outcome(id, "error"))
                .await
                .unwrap();
        }

        store
            .replace(COLLECTION, &ids[0], outcome(&ids[0], "warning"))
            .await
            .unwrap();

        let listed = store.list(COLLECTION, 10).await.unwrap();
        assert_eq!(listed[0]["id"], ids[0].to_string());
        assert_eq!(listed[0]["issue"][0]["severity"], "warning");
    }

    #[tokio::test]
    async fn test_missing_document_errors() {
        let store = MemoryBackend::new();
        let id = ResourceId::generate();

        assert!(store.find(COLLECTION, &id).await.unwrap_err().is_not_found());
        assert!(
            store
                .replace(COLLECTION, &id, json!({}))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(store.remove(COLLECTION, &id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryBackend::new();
        let id = ResourceId::generate();
        store
            .insert(COLLECTION, &id, outcome(&id, "error"))
            .await
            .unwrap();

        assert!(
            store
                .find("relatedpersons", &id)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert_eq!(store.count("relatedpersons").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_respects_limit_and_order() {
        let store = MemoryBackend::new();
        let ids: Vec<_> = (0..5).map(|_| ResourceId::generate()).collect();
        for id in &ids {
            store
                .insert(COLLECTION, id, outcome(id, "error"))
                .await
                .unwrap();
        }

        let listed = store.list(COLLECTION, 3).await.unwrap();
        let listed_ids: Vec<_> = listed.iter().map(|d| d["id"].clone()).collect();
        let expected: Vec<_> = ids[..3].iter().map(|id| json!(id.to_string())).collect();
        assert_eq!(listed_ids, expected);
    }
}
