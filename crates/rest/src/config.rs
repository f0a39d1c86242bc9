//! Server configuration for the Carebase REST API.
//!
//! Every setting is a command line flag with an environment variable
//! fallback.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CAREBASE_SERVER_PORT` | 3001 | Server port |
//! | `CAREBASE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `CAREBASE_LOG_LEVEL` | info | Log level |
//! | `CAREBASE_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `CAREBASE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `CAREBASE_ENABLE_CORS` | true | Answer CORS preflight requests |
//! | `CAREBASE_STORAGE_BACKEND` | memory | `memory` or `mongodb` |
//! | `CAREBASE_DATABASE_URL` | (none) | Database connection string |
//! | `CAREBASE_DATABASE_NAME` | fhir | Database name |
//! | `CAREBASE_PUBLIC_HOST` | (OS host name) | Host used in `Location` headers |
//! | `CAREBASE_ENROLLMENT_REQUEST_PORT` | 3001 | Port in EnrollmentRequest `Location` headers |
//! | `CAREBASE_OPERATION_OUTCOME_PORT` | 8080 | Port in OperationOutcome `Location` headers |
//! | `CAREBASE_RELATED_PERSON_PORT` | 8080 | Port in RelatedPerson `Location` headers |
//! | `CAREBASE_INDEX_LIMIT` | 100 | Records returned by an unfiltered index |
//! | `CAREBASE_SEARCH_DEFAULT_COUNT` | 100 | Search results when `_count` is absent |
//! | `CAREBASE_MAX_PAGE_SIZE` | 1000 | Upper bound for `_count` |
//! | `CAREBASE_STRICT_STATUS_CODES` | false | Answer 400/404 instead of 500 for bad bodies and missing records |
//!
//! # Example
//!
//! ```rust
//! use carebase_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     public_host: Some("fhir.example.org".to_string()),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use carebase_store::ResourceId;
use carebase_store::search::SearchLimits;
use clap::{Parser, ValueEnum};

use crate::responses::headers::location_url;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StorageBackendKind {
    /// Process-local store; contents are lost on exit.
    #[default]
    Memory,
    /// MongoDB (requires the `mongodb` feature).
    Mongodb,
}

/// Server configuration for the REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "carebase-server")]
#[command(about = "FHIR REST service for EnrollmentRequest, OperationOutcome and RelatedPerson")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "CAREBASE_SERVER_PORT", default_value = "3001")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CAREBASE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CAREBASE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "CAREBASE_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "CAREBASE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Answer CORS preflight requests.
    #[arg(long, env = "CAREBASE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Storage backend.
    #[arg(long, env = "CAREBASE_STORAGE_BACKEND", value_enum, default_value = "memory")]
    pub storage_backend: StorageBackendKind,

    /// Database connection string.
    #[arg(long, env = "CAREBASE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database name.
    #[arg(long, env = "CAREBASE_DATABASE_NAME", default_value = "fhir")]
    pub database_name: String,

    /// Host name written into `Location` headers. Defaults to the OS host name.
    #[arg(long, env = "CAREBASE_PUBLIC_HOST")]
    pub public_host: Option<String>,

    /// Port written into EnrollmentRequest `Location` headers.
    #[arg(long, env = "CAREBASE_ENROLLMENT_REQUEST_PORT", default_value = "3001")]
    pub enrollment_request_port: u16,

    /// Port written into OperationOutcome `Location` headers.
    #[arg(long, env = "CAREBASE_OPERATION_OUTCOME_PORT", default_value = "8080")]
    pub operation_outcome_port: u16,

    /// Port written into RelatedPerson `Location` headers.
    #[arg(long, env = "CAREBASE_RELATED_PERSON_PORT", default_value = "8080")]
    pub related_person_port: u16,

    /// Records returned by an index request without query parameters.
    #[arg(long, env = "CAREBASE_INDEX_LIMIT", default_value = "100")]
    pub index_limit: usize,

    /// Search results returned when `_count` is absent.
    #[arg(long, env = "CAREBASE_SEARCH_DEFAULT_COUNT", default_value = "100")]
    pub search_default_count: usize,

    /// Maximum value accepted for `_count`.
    #[arg(long, env = "CAREBASE_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: usize,

    /// Answer 400 for undecodable bodies and 404 for missing records
    /// instead of 500.
    #[arg(long, env = "CAREBASE_STRICT_STATUS_CODES", default_value = "false")]
    pub strict_status_codes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            storage_backend: StorageBackendKind::Memory,
            database_url: None,
            database_name: "fhir".to_string(),
            public_host: None,
            enrollment_request_port: 3001,
            operation_outcome_port: 8080,
            related_person_port: 8080,
            index_limit: 100,
            search_default_count: 100,
            max_page_size: 1000,
            strict_status_codes: false,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the MongoDB connection string, defaulting to a local server.
    pub fn database_url_or_default(&self) -> &str {
        self.database_url
            .as_deref()
            .unwrap_or("mongodb://localhost:27017")
    }

    /// Returns the result-size settings for the search compiler.
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            default_count: self.search_default_count,
            max_page_size: self.max_page_size,
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.index_limit == 0 {
            errors.push("Index limit cannot be 0".to_string());
        }

        if self.search_default_count == 0 {
            errors.push("Search default count cannot be 0".to_string());
        }

        if self.search_default_count > self.max_page_size {
            errors.push("Search default count cannot exceed max page size".to_string());
        }

        if let Some(host) = self.public_host.as_deref() {
            if host.trim().is_empty() {
                errors.push("Public host cannot be empty".to_string());
            } else if let Err(e) = location_url(
                host,
                self.enrollment_request_port,
                "EnrollmentRequest",
                &ResourceId::from_bytes([0; 12]).to_hex(),
            ) {
                errors.push(format!("Public host '{}' is not usable: {}", host, e));
            }
        }

        for (name, port) in [
            ("EnrollmentRequest", self.enrollment_request_port),
            ("OperationOutcome", self.operation_outcome_port),
            ("RelatedPerson", self.related_person_port),
        ] {
            if port == 0 {
                errors.push(format!("{} location port cannot be 0", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses ephemeral port 0 and a fixed public host so `Location` headers
    /// are predictable.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            public_host: Some("carebase.test".to_string()),
            ..Self::default()
        }
    }
}
