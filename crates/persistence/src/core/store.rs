//! Document store trait.
//!
//! This module defines the [`DocumentStore`] trait, the gateway every
//! resource handler goes through. Documents are plain JSON objects keyed by
//! a [`ResourceId`] inside a named collection.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageResult;
use crate::id::ResourceId;
use crate::search::CompiledQuery;

/// Storage gateway for JSON documents.
///
/// Every operation names the collection it acts on. Documents returned to
/// callers always carry their key in the `id` field, whatever the backend's
/// native key name.
///
/// # Example
///
/// ```
/// use carebase_store::backends::MemoryBackend;
/// use carebase_store::core::DocumentStore;
/// use carebase_store::id::ResourceId;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let store = MemoryBackend::new();
/// let id = ResourceId::generate();
///
/// store
///     .insert("relatedpersons", &id, json!({"id": id.to_string(), "gender": "other"}))
///     .await?;
///
/// let doc = store.find("relatedpersons", &id).await?;
/// assert_eq!(doc["gender"], "other");
///
/// store.remove("relatedpersons", &id).await?;
/// assert!(store.find("relatedpersons", &id).await.unwrap_err().is_not_found());
/// # Ok::<(), carebase_store::StorageError>(())
/// # }).unwrap();
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns up to `limit` documents in insertion order.
    async fn list(&self, collection: &str, limit: usize) -> StorageResult<Vec<Value>>;

    /// Fetches one document.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(ResourceError::NotFound)` - no such document
    async fn find(&self, collection: &str, id: &ResourceId) -> StorageResult<Value>;

    /// Stores a new document under `id`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(ResourceError::AlreadyExists)` - duplicate id
    async fn insert(&self, collection: &str, id: &ResourceId, document: Value)
    -> StorageResult<()>;

    /// Replaces the document stored under `id`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(ResourceError::NotFound)` - no such document
    async fn replace(
        &self,
        collection: &str,
        id: &ResourceId,
        document: Value,
    ) -> StorageResult<()>;

    /// Deletes the document stored under `id`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(ResourceError::NotFound)` - no such document
    async fn remove(&self, collection: &str, id: &ResourceId) -> StorageResult<()>;

    /// Returns the documents matching `query`, in insertion order, at most
    /// `query.limit()` of them.
    async fn search(&self, collection: &str, query: &CompiledQuery) -> StorageResult<Vec<Value>>;

    /// Returns the number of documents in the collection.
    async fn count(&self, collection: &str) -> StorageResult<u64>;
}
