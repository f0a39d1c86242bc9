//! Document store backends.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | (always) | Ordered in-process maps behind a read/write lock |
//! | MongoDB | `mongodb` | Official async driver |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "mongodb")]
//! use carebase_store::backends::mongodb::{MongoBackend, MongoBackendConfig};
//!
//! # #[cfg(feature = "mongodb")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MongoBackend::connect(MongoBackendConfig {
//!     url: "mongodb://localhost:27017".to_string(),
//!     database: "fhir".to_string(),
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use memory::MemoryBackend;
