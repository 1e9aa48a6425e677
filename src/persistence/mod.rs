//! Persistence Module
//!
//! Snapshot codec for namespaces plus on-disk snapshot files.

pub mod files;
mod snapshot;

pub use files::{load_snapshot, restore_all, save_all, save_snapshot, snapshot_path};
pub use snapshot::CacheSnapshot;
