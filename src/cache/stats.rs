//! Cache Statistics Module
//!
//! Tracks per-namespace hits, misses, evictions, size and memory estimate.

use serde::Serialize;

// == Cache Stats ==
/// Running counters for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted to stay within capacity
    pub evictions: u64,
    /// Current number of entries in the namespace
    pub size: usize,
    /// hits / (hits + misses) * 100, or 0 before any access
    pub hit_rate: f64,
    /// Approximate bytes held by live entries
    pub memory_usage: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.refresh_hit_rate();
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.refresh_hit_rate();
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Footprint ==
    /// Updates entry count and memory estimate after a mutation.
    pub fn set_footprint(&mut self, size: usize, memory_usage: usize) {
        self.size = size;
        self.memory_usage = memory_usage;
    }

    // == Reset ==
    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn refresh_hit_rate(&mut self) {
        self.hit_rate = hit_rate(self.hits, self.misses);
    }
}

// == Hit Rate ==
/// Hit percentage, defined as 0 when there were no accesses.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}
