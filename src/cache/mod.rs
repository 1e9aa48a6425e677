//! Cache Module
//!
//! Single-namespace cache engine: entries, eviction policy, stats and store.

mod clock;
mod entry;
mod eviction;
mod options;
mod order;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, ENTRY_OVERHEAD_BYTES};
pub use eviction::{select_victim, EvictionStrategy};
pub use options::{duration_to_ms, CacheConfig};
pub use order::InsertionOrder;
pub use stats::{hit_rate, CacheStats};
pub use store::CacheStore;
