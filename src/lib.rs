//! Namespace Cache - named, multi-strategy in-process cache store
//!
//! Independently configured namespaces with TTL expiry, LRU/LFU/FIFO
//! eviction, hit/miss statistics, read-through access and snapshots.

pub mod cache;
pub mod config;
pub mod error;
pub mod persistence;
pub mod registry;
pub mod tasks;

pub use cache::{CacheConfig, CacheEntry, CacheStats, EvictionStrategy};
pub use config::Config;
pub use error::{CacheError, Result};
pub use persistence::CacheSnapshot;
pub use registry::{CacheRegistry, CacheValue, Namespace, WarmEntry};
pub use tasks::spawn_janitor;
