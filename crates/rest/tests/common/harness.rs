//! REST API test harness.
//!
//! Wraps the full application, layers included, in an `axum_test` server.

use std::sync::Arc;

use axum_test::TestServer;
use carebase_rest::{AppState, ServerConfig, create_app_with_state};
use carebase_store::backends::MemoryBackend;
use carebase_store::core::DocumentStore;
use serde_json::Value;

use super::assertions::location_id;

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// let harness = RestTestHarness::new();
/// let id = harness.create("RelatedPerson", &json!({"gender": "female"})).await;
/// harness.get(&format!("/RelatedPerson/{}", id)).await.assert_status_ok();
/// ```
pub struct RestTestHarness<S>
where
    S: DocumentStore + 'static,
{
    /// The test server instance.
    pub server: TestServer,

    /// The document store behind the server.
    pub backend: Arc<S>,

    /// Server configuration.
    pub config: ServerConfig,
}

impl RestTestHarness<MemoryBackend> {
    /// Creates a harness over an empty in-memory store.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness over an empty in-memory store with `config`.
    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_backend(MemoryBackend::new(), config)
    }
}

impl<S> RestTestHarness<S>
where
    S: DocumentStore + 'static,
{
    /// Creates a harness over `backend`.
    pub fn with_backend(backend: S, config: ServerConfig) -> Self {
        let backend = Arc::new(backend);
        let state = AppState::new(Arc::clone(&backend), config.clone());
        let server =
            TestServer::new(create_app_with_state(state)).expect("Failed to create test server");

        Self {
            server,
            backend,
            config,
        }
    }

    /// Sends a GET request.
    pub async fn get(&self, path: &str) -> axum_test::TestResponse {
        self.server.get(path).await
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, path: &str) -> axum_test::TestResponse {
        self.server.delete(path).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post_json(&self, path: &str, body: &Value) -> axum_test::TestResponse {
        self.server.post(path).json(body).await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put_json(&self, path: &str, body: &Value) -> axum_test::TestResponse {
        self.server.put(path).json(body).await
    }

    /// Creates a record and returns the id from its `Location` header.
    pub async fn create(&self, resource_type: &str, body: &Value) -> String {
        let response = self.post_json(&format!("/{}", resource_type), body).await;
        assert!(
            response.status_code().is_success(),
            "create failed with {}: {}",
            response.status_code(),
            response.text()
        );
        location_id(&response)
    }

    /// Creates `n` records built by `make`.
    pub async fn seed(&self, resource_type: &str, n: usize, make: impl Fn(usize) -> Value) {
        for i in 0..n {
            self.create(resource_type, &make(i)).await;
        }
    }
}
