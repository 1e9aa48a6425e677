//! Cache Entry Module
//!
//! Defines a single cached value and its bookkeeping metadata.

use serde::{Deserialize, Serialize};

/// Fixed per-entry overhead used by the memory estimate, in bytes.
pub const ENTRY_OVERHEAD_BYTES: usize = 64;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// All timestamps and the TTL are milliseconds. The TTL is resolved when the
/// entry is inserted and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp
    pub created_at: u64,
    /// Lifetime measured from `created_at`
    pub ttl: u64,
    /// Number of successful reads
    pub access_count: u64,
    /// Timestamp of the last successful read (or insertion)
    pub last_accessed_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry inserted at `now` with the resolved TTL.
    pub fn new(value: V, ttl_ms: u64, now: u64) -> Self {
        Self {
            value,
            created_at: now,
            ttl: ttl_ms,
            access_count: 0,
            last_accessed_at: now,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since insertion, clamped at zero.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    // == Is Expired ==
    /// An entry is expired once strictly more than `ttl` has elapsed.
    pub fn is_expired(&self, now: u64) -> bool {
        self.age(now) > self.ttl
    }

    /// Whether a snapshot entry may be restored at `now`.
    ///
    /// Stricter than [`CacheEntry::is_expired`]: an entry exactly at its TTL is dropped.
    pub fn is_restorable(&self, now: u64) -> bool {
        self.age(now) < self.ttl
    }

    // == Touch ==
    /// Records a successful read at `now`.
    pub fn touch(&mut self, now: u64) {
        self.access_count += 1;
        self.last_accessed_at = now.max(self.created_at);
    }
}

impl<V: Serialize> CacheEntry<V> {
    // == Footprint ==
    /// Approximate memory held by this entry under `key`.
    ///
    /// `2 * key bytes + 2 * serialized value bytes + 64`. Values that cannot be
    /// serialized count as zero bytes.
    pub fn footprint(&self, key: &str) -> usize {
        let value_len = serde_json::to_vec(&self.value)
            .map(|bytes| bytes.len())
            .unwrap_or(0);
        2 * key.len() + 2 * value_len + ENTRY_OVERHEAD_BYTES
    }
}
