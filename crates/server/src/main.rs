//! Carebase FHIR server.
//!
//! Serves EnrollmentRequest, OperationOutcome and RelatedPerson over HTTP,
//! backed by the in-memory store or MongoDB.

use carebase_rest::{ServerConfig, StorageBackendKind, create_app_with_config, init_logging};
use carebase_store::backends::MemoryBackend;
use clap::Parser;
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = ?config.storage_backend,
        strict_status_codes = config.strict_status_codes,
        "Starting Carebase FHIR Server"
    );

    match config.storage_backend {
        StorageBackendKind::Memory => start_memory(config).await,
        StorageBackendKind::Mongodb => start_mongodb(config).await,
    }
}

/// Starts the server with the in-memory store.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    info!("Using in-memory store; records are lost on exit");
    let app = create_app_with_config(MemoryBackend::new(), config.clone());
    serve(app, &config).await
}

/// Starts the server with the MongoDB backend.
#[cfg(feature = "mongodb")]
async fn start_mongodb(config: ServerConfig) -> anyhow::Result<()> {
    use carebase_store::backends::mongodb::{MongoBackend, MongoBackendConfig};

    let backend_config = MongoBackendConfig {
        url: config.database_url_or_default().to_string(),
        database: config.database_name.clone(),
    };
    info!(database = %backend_config.database, "Initializing MongoDB backend");

    let backend = MongoBackend::connect(backend_config).await?;
    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when the mongodb feature is not enabled.
#[cfg(not(feature = "mongodb"))]
async fn start_mongodb(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The mongodb backend requires the 'mongodb' feature. \
         Build with: cargo build -p carebase-server --features mongodb"
    )
}
