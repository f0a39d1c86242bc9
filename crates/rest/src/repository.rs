//! Per-kind repository.
//!
//! A [`Repository`] binds the document store to one [`ResourceKind`]. It
//! stamps `id` and `resourceType` on incoming records, picks the collection
//! and maps store failures to [`RestError`]s. Path ids are parsed by the
//! handlers before any body is decoded.

use std::sync::Arc;

use carebase_store::core::DocumentStore;
use carebase_store::search::{SearchLimits, SearchParameterRegistry, SearchQuery};
use carebase_store::{ResourceId, StorageError};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::kind::ResourceKind;

/// Store access for one resource kind.
pub struct Repository<S> {
    storage: Arc<S>,
    kind: ResourceKind,
    strict: bool,
}

impl<S: DocumentStore> Repository<S> {
    /// Creates a repository.
    pub fn new(storage: Arc<S>, kind: ResourceKind, strict: bool) -> Self {
        Self {
            storage,
            kind,
            strict,
        }
    }

    /// The kind served.
    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn store_error(&self, err: StorageError) -> RestError {
        RestError::from_store(err, self.strict)
    }

    fn stamp(&self, id: &ResourceId, mut record: Map<String, Value>) -> Value {
        record.insert("id".to_string(), Value::String(id.to_hex()));
        record.insert(
            "resourceType".to_string(),
            Value::String(self.kind.name.to_string()),
        );
        Value::Object(record)
    }

    /// Lists or searches the collection.
    ///
    /// Without query parameters, or when the kind does not accept search,
    /// returns the first `index_limit` records. Otherwise compiles and runs
    /// the query.
    pub async fn index(
        &self,
        raw_query: Option<&str>,
        index_limit: usize,
        registry: &SearchParameterRegistry,
        limits: SearchLimits,
    ) -> RestResult<Vec<Value>> {
        let query = raw_query
            .filter(|_| self.kind.search_enabled)
            .map(|raw| SearchQuery::new(self.kind.name, raw))
            .filter(|q| !q.is_empty());

        match query {
            None => self
                .storage
                .list(self.kind.collection, index_limit)
                .await
                .map_err(|e| self.store_error(e)),
            Some(query) => {
                let compiled = query.compile(registry, limits)?;
                debug!(
                    resource_type = self.kind.name,
                    clauses = compiled.clauses().len(),
                    limit = compiled.limit(),
                    "Running search"
                );
                self.storage
                    .search(self.kind.collection, &compiled)
                    .await
                    .map_err(|e| self.store_error(e))
            }
        }
    }

    /// Fetches one record.
    pub async fn show(&self, id: &ResourceId) -> RestResult<Value> {
        self.storage
            .find(self.kind.collection, id)
            .await
            .map_err(|e| self.store_error(e))
    }

    /// Stores a new record under `id`, which the caller generates.
    pub async fn create(&self, id: &ResourceId, record: Map<String, Value>) -> RestResult<Value> {
        let record = self.stamp(id, record);
        self.storage
            .insert(self.kind.collection, id, record.clone())
            .await
            .map_err(|e| self.store_error(e))?;
        Ok(record)
    }

    /// Replaces a record. The path id wins over any id in the body.
    pub async fn update(&self, id: &ResourceId, record: Map<String, Value>) -> RestResult<Value> {
        let record = self.stamp(id, record);
        self.storage
            .replace(self.kind.collection, id, record.clone())
            .await
            .map_err(|e| self.store_error(e))?;
        Ok(record)
    }

    /// Deletes a record.
    pub async fn delete(&self, id: &ResourceId) -> RestResult<()> {
        self.storage
            .remove(self.kind.collection, id)
            .await
            .map_err(|e| self.store_error(e))
    }
}
