//! Cache Store Module
//!
//! One namespace's key table: HashMap storage plus insertion order, TTL
//! expiry, policy-driven eviction and stats bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::cache::{
    duration_to_ms, select_victim, CacheConfig, CacheEntry, CacheStats, Clock, InsertionOrder,
};

/// An entry plus its cached memory estimate.
#[derive(Debug, Clone)]
struct Slot<V> {
    entry: CacheEntry<V>,
    footprint: usize,
}

// == Cache Store ==
/// Storage for a single namespace.
///
/// Not synchronized on its own; the registry wraps each store in a lock.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, Slot<V>>,
    /// Insertion order for eviction scans and tie-breaks
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
    /// TTL, capacity and strategy
    config: CacheConfig,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Sum of slot footprints
    memory_usage: usize,
}

impl<V: Clone + Serialize> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store for the given namespace configuration.
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            config,
            clock,
            memory_usage: 0,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry under `key`.
    ///
    /// Inserting a new key into a full store first evicts one entry per the
    /// configured strategy. The TTL is `ttl` if given, else the config default.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let now = self.now();
        let ttl_ms = ttl.map(duration_to_ms).unwrap_or_else(|| self.config.ttl_ms());
        self.insert(key.into(), CacheEntry::new(value, ttl_ms, now));
    }

    // == Restore ==
    /// Inserts a previously exported entry with its metadata intact.
    ///
    /// Same capacity rule as [`CacheStore::set`].
    pub fn restore(&mut self, key: impl Into<String>, mut entry: CacheEntry<V>) {
        entry.last_accessed_at = entry.last_accessed_at.max(entry.created_at);
        self.insert(key.into(), entry);
    }

    fn insert(&mut self, key: String, entry: CacheEntry<V>) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.config.capacity() {
                if !self.evict_one() {
                    break;
                }
            }
        }

        let footprint = entry.footprint(&key);
        self.memory_usage += footprint;
        self.order.push(&key);
        if let Some(old) = self.entries.insert(key, Slot { entry, footprint }) {
            self.memory_usage -= old.footprint;
        }
        self.refresh_footprint();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Missing and expired keys count as misses; expired entries are removed.
    /// A hit bumps the entry's access count and last-access time.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.now();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(slot) => slot.entry.is_expired(now),
        };

        if expired {
            debug!(key, "lazy expiry");
            self.remove_key(key);
            self.refresh_footprint();
            self.stats.record_miss();
            return None;
        }

        let slot = self.entries.get_mut(key)?;
        slot.entry.touch(now);
        let value = slot.entry.value.clone();
        self.stats.record_hit();
        Some(value)
    }

    // == Has ==
    /// Same result and side effects as [`CacheStore::get`].
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Peek ==
    /// Reads a live value without touching metadata or counters.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let now = self.now();
        self.entries
            .get(key)
            .filter(|slot| !slot.entry.is_expired(now))
            .map(|slot| &slot.entry.value)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.remove_key(key);
        if existed {
            self.refresh_footprint();
        }
        existed
    }

    // == Clear ==
    /// Drops every entry and zeroes all stats. Configuration is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.memory_usage = 0;
        self.stats.reset();
    }

    // == Reconfigure ==
    /// Replaces the configuration, evicting until the new capacity holds.
    ///
    /// Returns the number of evicted entries.
    pub fn reconfigure(&mut self, config: CacheConfig) -> usize {
        self.config = config;
        let mut evicted = 0;
        while self.entries.len() > self.config.capacity() && self.evict_one() {
            evicted += 1;
        }
        self.refresh_footprint();
        evicted
    }

    // == Stats ==
    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Sweep Expired ==
    /// Removes all expired entries. Hit/miss counters are untouched.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_key(key);
        }

        if !expired_keys.is_empty() {
            self.refresh_footprint();
        }
        expired_keys.len()
    }

    // == Entries ==
    /// Clones every present entry in insertion order, expired ones included.
    pub fn entries(&self) -> Vec<(String, CacheEntry<V>)> {
        self.order
            .iter()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .map(|slot| (key.clone(), slot.entry.clone()))
            })
            .collect()
    }

    // == Keys ==
    /// Present keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evicts one entry per the configured strategy. False when empty.
    fn evict_one(&mut self) -> bool {
        let victim = select_victim(
            self.config.strategy,
            self.order.iter().filter_map(|key| {
                self.entries
                    .get(key)
                    .map(|slot| (key.as_str(), &slot.entry))
            }),
        )
        .map(str::to_owned);

        match victim {
            Some(key) => {
                debug!(key = %key, strategy = %self.config.strategy, "evicting entry");
                self.remove_key(&key);
                self.stats.record_eviction();
                true
            }
            None => false,
        }
    }

    fn remove_key(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(slot) => {
                self.memory_usage -= slot.footprint;
                self.order.remove(key);
                true
            }
            None => false,
        }
    }

    fn refresh_footprint(&mut self) {
        self.stats
            .set_footprint(self.entries.len(), self.memory_usage);
    }
}
