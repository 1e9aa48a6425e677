//! Eviction Policy Module
//!
//! Selects the victim key when a namespace is at capacity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;

// == Eviction Strategy ==
/// Eviction strategy configured per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvictionStrategy {
    /// Least recently used: smallest `last_accessed_at`
    #[serde(rename = "LRU")]
    Lru,
    /// Least frequently used: smallest `access_count`
    #[serde(rename = "LFU")]
    Lfu,
    /// First in, first out: smallest `created_at`
    #[serde(rename = "FIFO")]
    Fifo,
}

impl EvictionStrategy {
    /// The ordering key this strategy minimises.
    fn rank<V>(self, entry: &CacheEntry<V>) -> u64 {
        match self {
            EvictionStrategy::Lru => entry.last_accessed_at,
            EvictionStrategy::Lfu => entry.access_count,
            EvictionStrategy::Fifo => entry.created_at,
        }
    }
}

impl fmt::Display for EvictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvictionStrategy::Lru => "LRU",
            EvictionStrategy::Lfu => "LFU",
            EvictionStrategy::Fifo => "FIFO",
        };
        f.write_str(name)
    }
}

// == Select Victim ==
/// Picks the key to evict from `entries`, which must be yielded in insertion order.
///
/// Ties go to the earliest key in that order. Returns `None` only for an empty input.
pub fn select_victim<'a, V, I>(strategy: EvictionStrategy, entries: I) -> Option<&'a str>
where
    V: 'a,
    I: IntoIterator<Item = (&'a str, &'a CacheEntry<V>)>,
{
    let mut victim: Option<(&'a str, u64)> = None;

    for (key, entry) in entries {
        let rank = strategy.rank(entry);
        match victim {
            Some((_, best)) if rank >= best => {}
            _ => victim = Some((key, rank)),
        }
    }

    victim.map(|(key, _)| key)
}
