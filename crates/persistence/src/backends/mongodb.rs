//! MongoDB backend.
//!
//! Each collection name maps to a MongoDB collection of the same name. The
//! document key is stored as `_id` (the hex id string) and surfaced to
//! callers as `id`.
//!
//! Compiled queries are evaluated in two stages. Clauses with a BSON
//! equivalent (`_id`, unmodified tokens, date prefixes) are pushed into the
//! server-side filter as a superset of the final answer, then every returned
//! document is checked with [`CompiledQuery::matches`] so both backends
//! agree on search semantics.
//!
//! String and reference clauses and every modifier are not pushed down. A
//! query made only of those scans the collection until `limit` matches are
//! found.

use std::fmt::Debug;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Database};
use serde_json::Value;

use crate::core::DocumentStore;
use crate::error::{BackendError, ResourceError, StorageError, StorageResult};
use crate::id::ResourceId;
use crate::search::{
    CompiledQuery, SearchClause, SearchParamType, SearchPrefix, SearchValue,
};

const DUPLICATE_KEY: i32 = 11000;

/// Connection settings for the MongoDB backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoBackendConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    pub url: String,
    /// Database holding the collections.
    pub database: String,
}

impl Default for MongoBackendConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "fhir".to_string(),
        }
    }
}

/// Document store backed by a MongoDB database.
pub struct MongoBackend {
    database: Database,
    config: MongoBackendConfig,
}

impl Debug for MongoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoBackend")
            .field("database", &self.config.database)
            .finish_non_exhaustive()
    }
}

impl MongoBackend {
    /// Connects to the server and verifies it answers a ping.
    pub async fn connect(config: MongoBackendConfig) -> StorageResult<Self> {
        let client = Client::with_uri_str(&config.url).await.map_err(|e| {
            BackendError::ConnectionFailed {
                backend_name: "mongodb".to_string(),
                message: e.to_string(),
            }
        })?;

        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| BackendError::ConnectionFailed {
                backend_name: "mongodb".to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(database = %config.database, "Connected to MongoDB");
        Ok(Self { database, config })
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection(name)
    }
}

fn key_filter(id: &ResourceId) -> Document {
    doc! { "_id": id.to_string() }
}

/// Converts a caller document into its stored form.
fn to_stored(id: &ResourceId, document: Value) -> StorageResult<Document> {
    let mut stored = match Bson::try_from(document)? {
        Bson::Document(d) => d,
        other => {
            return Err(BackendError::SerializationError {
                message: format!("expected a JSON object, got {:?}", other.element_type()),
            }
            .into());
        }
    };
    stored.remove("id");
    stored.insert("_id", id.to_string());
    Ok(stored)
}

/// Converts a stored document into the form handed to callers.
fn from_stored(mut stored: Document) -> Value {
    let key = stored.remove("_id");
    let mut value = Bson::Document(stored).into_relaxed_extjson();
    if let (Some(Bson::String(key)), Value::Object(map)) = (key, &mut value) {
        map.insert("id".to_string(), Value::String(key));
    }
    value
}

/// Builds the server-side part of a search filter.
fn pushdown_filter(query: &CompiledQuery) -> Document {
    let mut conditions: Vec<Document> = query.clauses().iter().filter_map(clause_filter).collect();
    match conditions.len() {
        0 => Document::new(),
        1 => conditions.remove(0),
        _ => doc! { "$and": conditions },
    }
}

fn clause_filter(clause: &SearchClause) -> Option<Document> {
    if clause.modifier.is_some() {
        return None;
    }

    if clause.code == "_id" {
        let ids: Vec<&str> = clause.values.iter().map(|v| v.value.as_str()).collect();
        return Some(doc! { "_id": { "$in": ids } });
    }

    let mut alternatives = Vec::new();
    for value in &clause.values {
        for path in &clause.paths {
            match clause.param_type {
                SearchParamType::Token => alternatives.extend(token_filters(path, &value.value)),
                SearchParamType::Date => alternatives.push(date_filter(path, value)?),
                SearchParamType::String | SearchParamType::Reference => return None,
            }
        }
    }

    match alternatives.len() {
        0 => None,
        1 => alternatives.pop(),
        _ => Some(doc! { "$or": alternatives }),
    }
}

/// Equality on every shape a token can be stored in. The system half of
/// `system|code` is left to the matcher.
fn token_filters(path: &str, wanted: &str) -> Vec<Document> {
    let code = wanted.split_once('|').map_or(wanted, |(_, code)| code);

    let mut filters = vec![
        field(path, code),
        field(format!("{}.code", path), code),
        field(format!("{}.value", path), code),
        field(format!("{}.coding.code", path), code),
    ];
    if let Ok(flag) = code.parse::<bool>() {
        filters.push(field(path, flag));
    }
    if let Ok(number) = code.parse::<f64>() {
        filters.push(field(path, number));
    }
    filters
}

/// Year-granular range on a date string.
///
/// The matcher compares at the coarser of the two precisions, so only the
/// year of the wanted value bounds the range. Stored dates are assumed to
/// carry at least a year.
fn date_filter(path: &str, wanted: &SearchValue) -> Option<Document> {
    let year = wanted.value.get(..4)?;
    let next_year = year
        .parse::<u16>()
        .ok()
        .filter(|y| *y < 9999)
        .map(|y| format!("{:04}", y + 1));

    let range = match (wanted.prefix, next_year) {
        (SearchPrefix::Ne, _) => return None,
        (SearchPrefix::Gt | SearchPrefix::Ge, _) => doc! { "$gte": year },
        (SearchPrefix::Lt | SearchPrefix::Le, Some(next)) => doc! { "$lt": next },
        (SearchPrefix::Eq, Some(next)) => doc! { "$gte": year, "$lt": next },
        (SearchPrefix::Eq, None) => doc! { "$gte": year },
        (SearchPrefix::Lt | SearchPrefix::Le, None) => return None,
    };
    Some(field(path, range))
}

fn field(path: impl Into<String>, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(path, value);
    document
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl DocumentStore for MongoBackend {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn list(&self, collection: &str, limit: usize) -> StorageResult<Vec<Value>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self.collection(collection).find(doc! {}).limit(limit).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(from_stored).collect())
    }

    async fn find(&self, collection: &str, id: &ResourceId) -> StorageResult<Value> {
        self.collection(collection)
            .find_one(key_filter(id))
            .await?
            .map(from_stored)
            .ok_or_else(|| {
                ResourceError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn insert(
        &self,
        collection: &str,
        id: &ResourceId,
        document: Value,
    ) -> StorageResult<()> {
        let stored = to_stored(id, document)?;
        match self.collection(collection).insert_one(stored).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(ResourceError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into()),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    async fn replace(
        &self,
        collection: &str,
        id: &ResourceId,
        document: Value,
    ) -> StorageResult<()> {
        let stored = to_stored(id, document)?;
        let result = self
            .collection(collection)
            .replace_one(key_filter(id), stored)
            .await?;

        if result.matched_count == 0 {
            return Err(ResourceError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &ResourceId) -> StorageResult<()> {
        let result = self
            .collection(collection)
            .delete_one(key_filter(id))
            .await?;

        if result.deleted_count == 0 {
            return Err(ResourceError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn search(&self, collection: &str, query: &CompiledQuery) -> StorageResult<Vec<Value>> {
        let filter = pushdown_filter(query);
        tracing::debug!(collection, filter = %filter, "Running search");

        let mut cursor = self
            .collection(collection)
            .find(filter)
            .batch_size(u32::try_from(query.limit()).unwrap_or(u32::MAX))
            .await?;
        let mut results = Vec::new();
        while results.len() < query.limit() {
            let Some(stored) = cursor.try_next().await? else {
                break;
            };
            let document = from_stored(stored);
            if query.matches(&document) {
                results.push(document);
            }
        }
        Ok(results)
    }

    async fn count(&self, collection: &str) -> StorageResult<u64> {
        Ok(self
            .collection(collection)
            .count_documents(doc! {})
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::search::{SearchLimits, SearchParameterRegistry, SearchQuery};

    #[test]
    fn test_stored_form_uses_underscore_id() {
        let id = ResourceId::parse("507f1f77bcf86cd799439011").unwrap();
        let stored = to_stored(
            &id,
            json!({"resourceType": "RelatedPerson", "id": "ignored", "gender": "male"}),
        )
        .unwrap();

        assert_eq!(stored.get_str("_id").unwrap(), "507f1f77bcf86cd799439011");
        assert!(!stored.contains_key("id"));

        let back = from_stored(stored);
        assert_eq!(back["id"], "507f1f77bcf86cd799439011");
        assert_eq!(back["gender"], "male");
        assert!(back.get("_id").is_none());
    }

    #[test]
    fn test_non_object_document_rejected() {
        let id = ResourceId::generate();
        assert!(to_stored(&id, json!([1, 2, 3])).is_err());
    }

    fn compile(resource_type: &str, raw: &str) -> CompiledQuery {
        SearchQuery::new(resource_type, raw)
            .compile(
                &SearchParameterRegistry::with_builtin(),
                SearchLimits::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_id_and_token_clauses_are_pushed_down() {
        let query = compile(
            "EnrollmentRequest",
            "_id=507f1f77bcf86cd799439011&status=active",
        );

        assert_eq!(
            pushdown_filter(&query),
            doc! { "$and": [
                { "_id": { "$in": ["507f1f77bcf86cd799439011"] } },
                { "$or": [
                    { "status": "active" },
                    { "status.code": "active" },
                    { "status.value": "active" },
                    { "status.coding.code": "active" }
                ] }
            ] }
        );
    }

    #[test]
    fn test_token_system_is_left_to_matcher() {
        let query = compile("OperationOutcome", "severity=http://hl7.org/fhir/issue-severity|error");

        let filter = pushdown_filter(&query);
        let alternatives = filter.get_array("$or").unwrap();
        assert_eq!(alternatives.len(), 4);
        assert_eq!(
            alternatives[0],
            Bson::Document(doc! { "issue.severity": "error" })
        );
    }

    #[test]
    fn test_date_prefixes_become_year_ranges() {
        let cases = [
            ("created=2021-03-15", doc! { "created": { "$gte": "2021", "$lt": "2022" } }),
            ("created=ge2021-03-15", doc! { "created": { "$gte": "2021" } }),
            ("created=gt2021-03-15", doc! { "created": { "$gte": "2021" } }),
            ("created=lt2021-03-15", doc! { "created": { "$lt": "2022" } }),
            ("created=le2021-03-15", doc! { "created": { "$lt": "2022" } }),
            ("created=ne2021-03-15", doc! {}),
        ];
        for (raw, expected) in cases {
            assert_eq!(pushdown_filter(&compile("EnrollmentRequest", raw)), expected, "{}", raw);
        }
    }

    #[test]
    fn test_unpushable_clauses_scan() {
        assert_eq!(pushdown_filter(&compile("RelatedPerson", "name=silva")), doc! {});
        assert_eq!(
            pushdown_filter(&compile("EnrollmentRequest", "patient=Patient/pat-1")),
            doc! {}
        );
        assert_eq!(
            pushdown_filter(&compile("EnrollmentRequest", "status:not=active")),
            doc! {}
        );
    }
}
