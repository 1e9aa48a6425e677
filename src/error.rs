//! Error types for the cache registry
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for registry, store and snapshot operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Operation addressed to a namespace that was never created
    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    /// Snapshot record could not be parsed into `{config, entries}`
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A read-through producer failed; nothing was cached
    #[error("Producer failed: {0}")]
    Producer(#[source] anyhow::Error),

    /// A cached value could not be encoded while exporting a record
    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Snapshot file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache registry.
pub type Result<T> = std::result::Result<T, CacheError>;
