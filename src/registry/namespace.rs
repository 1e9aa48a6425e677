//! Namespace Handle
//!
//! Cheap, cloneable proxy to one registered store. Each call takes the
//! store's lock for the duration of the operation only.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::{CacheConfig, CacheStats, CacheStore};
use crate::registry::CacheValue;

pub(crate) type SharedStore<V> = Arc<RwLock<CacheStore<V>>>;

/// Handle to a named store, obtained from [`crate::CacheRegistry::namespace`].
///
/// Re-creating the name resets the shared store in place, so a handle always
/// addresses the store currently registered under its name.
#[derive(Clone)]
pub struct Namespace<V> {
    name: String,
    store: SharedStore<V>,
}

impl<V: CacheValue> Namespace<V> {
    pub(crate) fn new(name: impl Into<String>, store: SharedStore<V>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.store.write().await.set(key, value, ttl);
    }

    // get and has update access metadata, so both need the write lock
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Live value without touching metadata or counters.
    pub async fn peek(&self, key: &str) -> Option<V> {
        self.store.read().await.peek(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn config(&self) -> CacheConfig {
        *self.store.read().await.config()
    }

    pub(crate) fn store(&self) -> &SharedStore<V> {
        &self.store
    }
}
