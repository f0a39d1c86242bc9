//! Application state for the REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the document store, configuration, the served resource
//! kinds and the search parameter registry.

use std::sync::Arc;

use carebase_store::core::DocumentStore;
use carebase_store::search::SearchParameterRegistry;

use crate::config::ServerConfig;
use crate::error::{RestError, RestResult};
use crate::kind::{ResourceKind, ResourceKinds};
use crate::repository::Repository;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The document store type (must implement [`DocumentStore`])
///
/// # Example
///
/// ```rust
/// use carebase_rest::{AppState, ServerConfig};
/// use carebase_store::backends::MemoryBackend;
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default());
/// assert!(state.kind("RelatedPerson").is_ok());
/// ```
pub struct AppState<S> {
    /// The document store.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Served resource kinds.
    kinds: Arc<ResourceKinds>,

    /// Search parameters per resource type.
    search_registry: Arc<SearchParameterRegistry>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            kinds: Arc::clone(&self.kinds),
            search_registry: Arc::clone(&self.search_registry),
        }
    }
}

impl<S> AppState<S> {
    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl<S: DocumentStore> AppState<S> {
    /// Creates a new AppState serving the built-in resource kinds.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        let kinds = ResourceKinds::from_config(&config);
        Self::with_kinds(storage, config, kinds)
    }

    /// Creates a new AppState serving the given resource kinds.
    pub fn with_kinds(storage: Arc<S>, config: ServerConfig, kinds: ResourceKinds) -> Self {
        Self {
            storage,
            config: Arc::new(config),
            kinds: Arc::new(kinds),
            search_registry: Arc::new(SearchParameterRegistry::with_builtin()),
        }
    }

    /// Returns a reference to the document store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the served resource kinds.
    pub fn kinds(&self) -> &ResourceKinds {
        &self.kinds
    }

    /// Returns the search parameter registry.
    pub fn search_registry(&self) -> &SearchParameterRegistry {
        &self.search_registry
    }

    /// Looks up a served resource kind by name.
    pub fn kind(&self, resource_type: &str) -> RestResult<&ResourceKind> {
        self.kinds
            .get(resource_type)
            .ok_or_else(|| RestError::UnknownResourceType {
                resource_type: resource_type.to_string(),
            })
    }

    /// Returns the repository for a served resource kind.
    pub fn repository(&self, resource_type: &str) -> RestResult<Repository<S>> {
        let kind = self.kind(resource_type)?.clone();
        Ok(Repository::new(
            Arc::clone(&self.storage),
            kind,
            self.config.strict_status_codes,
        ))
    }
}
