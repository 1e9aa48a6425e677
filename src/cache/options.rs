//! Namespace Configuration Module
//!
//! Per-namespace TTL, capacity and eviction strategy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::EvictionStrategy;

// == Cache Config ==
/// Configuration of a single namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Default lifetime for entries set without an override
    #[serde(with = "duration_ms")]
    pub ttl: Duration,
    /// Maximum number of entries; must be greater than zero
    pub max_size: usize,
    /// Victim selection when the namespace is full
    pub strategy: EvictionStrategy,
}

impl CacheConfig {
    pub fn new(ttl: Duration, max_size: usize, strategy: EvictionStrategy) -> Self {
        Self {
            ttl,
            max_size,
            strategy,
        }
    }

    pub fn lru(ttl: Duration, max_size: usize) -> Self {
        Self::new(ttl, max_size, EvictionStrategy::Lru)
    }

    pub fn lfu(ttl: Duration, max_size: usize) -> Self {
        Self::new(ttl, max_size, EvictionStrategy::Lfu)
    }

    pub fn fifo(ttl: Duration, max_size: usize) -> Self {
        Self::new(ttl, max_size, EvictionStrategy::Fifo)
    }

    /// Default TTL in milliseconds.
    pub fn ttl_ms(&self) -> u64 {
        duration_to_ms(self.ttl)
    }

    /// Capacity actually enforced; a zero `max_size` behaves as one.
    pub fn capacity(&self) -> usize {
        self.max_size.max(1)
    }
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(super::duration_to_ms(*ttl))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
