//! MongoDB backend integration tests.
//!
//! These tests need a reachable MongoDB server and are ignored by default.
//!
//! Run with:
//!   CAREBASE_TEST_MONGODB_URL=mongodb://localhost:27017 \
//!     cargo test -p carebase-store --features mongodb -- --ignored

#![cfg(feature = "mongodb")]

use serde_json::json;

use carebase_store::backends::mongodb::{MongoBackend, MongoBackendConfig};
use carebase_store::core::DocumentStore;
use carebase_store::id::ResourceId;
use carebase_store::search::{SearchLimits, SearchParameterRegistry, SearchQuery};

async fn connect() -> MongoBackend {
    let url = std::env::var("CAREBASE_TEST_MONGODB_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let database = format!("carebase_test_{}", ResourceId::generate());
    MongoBackend::connect(MongoBackendConfig { url, database })
        .await
        .expect("Failed to connect to MongoDB")
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn test_crud_roundtrip() {
    let store = connect().await;
    let id = ResourceId::generate();

    store
        .insert(
            "relatedpersons",
            &id,
            json!({"resourceType": "RelatedPerson", "id": id.to_string(), "gender": "female"}),
        )
        .await
        .unwrap();

    let doc = store.find("relatedpersons", &id).await.unwrap();
    assert_eq!(doc["id"], id.to_string());
    assert!(doc.get("_id").is_none());

    let dup = store
        .insert("relatedpersons", &id, json!({"id": id.to_string()}))
        .await
        .unwrap_err();
    assert!(dup.is_conflict());

    store
        .replace(
            "relatedpersons",
            &id,
            json!({"resourceType": "RelatedPerson", "id": id.to_string(), "gender": "male"}),
        )
        .await
        .unwrap();
    assert_eq!(
        store.find("relatedpersons", &id).await.unwrap()["gender"],
        "male"
    );

    store.remove("relatedpersons", &id).await.unwrap();
    assert!(
        store
            .remove("relatedpersons", &id)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn test_search_applies_matcher_and_limit() {
    let store = connect().await;
    for gender in ["female", "male", "female", "female"] {
        let id = ResourceId::generate();
        store
            .insert(
                "relatedpersons",
                &id,
                json!({"resourceType": "RelatedPerson", "gender": gender}),
            )
            .await
            .unwrap();
    }

    let query = SearchQuery::new("RelatedPerson", "gender=female&_count=2")
        .compile(
            &SearchParameterRegistry::with_builtin(),
            SearchLimits::default(),
        )
        .unwrap();

    let results = store.search("relatedpersons", &query).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|d| d["gender"] == "female"));
    assert_eq!(store.count("relatedpersons").await.unwrap(), 4);
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn test_pushed_down_search_matches_memory_backend() {
    use carebase_store::backends::MemoryBackend;

    let mongo = connect().await;
    let memory = MemoryBackend::new();
    let records = [
        json!({"status": "active", "created": "2020-12-31"}),
        json!({"status": "active", "created": "2021-03-15T09:30:00Z"}),
        json!({"status": {"coding": [{"code": "active"}]}, "created": "2021-07"}),
        json!({"status": "cancelled", "created": "2022-01-01"}),
    ];
    for mut record in records {
        let id = ResourceId::generate();
        record["id"] = json!(id.to_hex());
        mongo
            .insert("enrollmentrequests", &id, record.clone())
            .await
            .unwrap();
        memory
            .insert("enrollmentrequests", &id, record)
            .await
            .unwrap();
    }

    let registry = SearchParameterRegistry::with_builtin();
    for raw in [
        "status=active",
        "created=ge2021-03-15",
        "created=lt2021-07-01",
        "status=active&created=2021",
        "status:not=active",
    ] {
        let query = SearchQuery::new("EnrollmentRequest", raw)
            .compile(&registry, SearchLimits::default())
            .unwrap();
        let mut from_mongo = mongo.search("enrollmentrequests", &query).await.unwrap();
        let mut from_memory = memory.search("enrollmentrequests", &query).await.unwrap();
        from_mongo.sort_by_key(|d| d["id"].to_string());
        from_memory.sort_by_key(|d| d["id"].to_string());
        assert_eq!(from_mongo, from_memory, "{}", raw);
    }
}
