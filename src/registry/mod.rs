//! Cache Registry
//!
//! Directory of named cache stores. This is the entry point the rest of an
//! application talks to: namespace-scoped operations, read-through,
//! batch access, warming and stats.
//!
//! The registry is a handle: clones share the same namespaces. Separate
//! `CacheRegistry::new` calls produce fully independent registries.

mod namespace;
mod presets;
mod warm;

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheConfig, CacheStats, CacheStore, Clock, SystemClock};
use crate::error::{CacheError, Result};

pub use namespace::Namespace;
pub(crate) use namespace::SharedStore;
pub use presets::{default_namespaces, API, IMAGES, PREFERENCES, SEARCH, STATIC};
pub use warm::{Producer, WarmEntry};

// == Cache Value ==
/// Bounds every cached payload must satisfy.
pub trait CacheValue: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

// == Cache Registry ==
/// Named cache stores sharing one clock.
pub struct CacheRegistry<V = serde_json::Value> {
    namespaces: Arc<RwLock<HashMap<String, SharedStore<V>>>>,
    clock: Arc<dyn Clock>,
}

impl<V> Clone for CacheRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            namespaces: Arc::clone(&self.namespaces),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<V: CacheValue> Default for CacheRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: CacheValue> CacheRegistry<V> {
    // == Constructors ==
    /// Creates an empty registry on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty registry on a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            namespaces: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Creates a registry holding the default namespaces.
    pub async fn with_presets(clock: Arc<dyn Clock>) -> Self {
        let registry = Self::with_clock(clock);
        for (name, config) in default_namespaces() {
            registry.create_namespace(name, config).await;
        }
        registry
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    // == Create Namespace ==
    /// Registers a new empty store under `name`.
    ///
    /// An existing namespace with the same name is reset in place: its entries
    /// and stats are lost, and handles obtained earlier see the new store.
    pub async fn create_namespace(&self, name: impl Into<String>, config: CacheConfig) {
        let name = name.into();
        let fresh = CacheStore::new(config, self.clock());

        // One shared store per name for the registry's lifetime
        let mut namespaces = self.namespaces.write().await;
        let replaced = match namespaces.get(&name) {
            Some(store) => {
                *store.write().await = fresh;
                true
            }
            None => {
                namespaces.insert(name.clone(), Arc::new(RwLock::new(fresh)));
                false
            }
        };
        drop(namespaces);

        info!(
            namespace = %name,
            ttl_ms = config.ttl_ms(),
            max_size = config.max_size,
            strategy = %config.strategy,
            replaced,
            "namespace created"
        );
    }

    /// Returns the existing store, creating it with `config` if missing.
    pub(crate) async fn get_or_create(&self, name: &str, config: CacheConfig) -> SharedStore<V> {
        let mut namespaces = self.namespaces.write().await;
        if let Some(store) = namespaces.get(name) {
            return Arc::clone(store);
        }

        info!(namespace = %name, "namespace created from record");
        let store = Arc::new(RwLock::new(CacheStore::new(config, self.clock())));
        namespaces.insert(name.to_string(), Arc::clone(&store));
        store
    }

    // == Namespace ==
    /// Looks up a namespace proxy.
    pub async fn namespace(&self, name: &str) -> Result<Namespace<V>> {
        self.namespaces
            .read()
            .await
            .get(name)
            .map(|store| Namespace::new(name, Arc::clone(store)))
            .ok_or_else(|| CacheError::NamespaceNotFound(name.to_string()))
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.namespaces.read().await.contains_key(name)
    }

    /// Registered namespace names, sorted.
    pub async fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    // == Reconfigure ==
    /// Replaces a namespace's configuration in place, keeping its entries.
    ///
    /// Returns how many entries were evicted to fit the new capacity.
    pub async fn reconfigure(&self, name: &str, config: CacheConfig) -> Result<usize> {
        let namespace = self.namespace(name).await?;
        let evicted = namespace.store().write().await.reconfigure(config);
        info!(namespace = %name, evicted, "namespace reconfigured");
        Ok(evicted)
    }

    // == Get Or Compute ==
    /// Read-through access.
    ///
    /// On a hit the cached value is returned and `producer` is never called.
    /// On a miss the producer's value is stored and returned; its error is
    /// returned as [`CacheError::Producer`] and nothing is cached. No lock is
    /// held while the producer runs, so concurrent misses on the same key each
    /// run their own producer.
    pub async fn get_or_compute<F, Fut>(
        &self,
        name: &str,
        key: &str,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let namespace = self.namespace(name).await?;
        if let Some(value) = namespace.get(key).await {
            return Ok(value);
        }

        debug!(namespace = %namespace.name(), key, "read-through miss");
        let value = producer().await.map_err(CacheError::Producer)?;
        namespace.set(key, value.clone(), ttl).await;
        Ok(value)
    }

    // == Batch Operations ==
    /// Sets every pair in order under a single lock acquisition.
    pub async fn set_many<I, K>(&self, name: &str, entries: I, ttl: Option<Duration>) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let namespace = self.namespace(name).await?;
        let mut store = namespace.store().write().await;
        for (key, value) in entries {
            store.set(key, value, ttl);
        }
        Ok(())
    }

    /// Gets every key in order; absent or expired keys map to `None`.
    pub async fn get_many<I, K>(&self, name: &str, keys: I) -> Result<HashMap<String, Option<V>>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let namespace = self.namespace(name).await?;
        let mut store = namespace.store().write().await;
        Ok(keys
            .into_iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_string(), store.get(key))
            })
            .collect())
    }

    /// Deletes every key in order, returning how many existed.
    pub async fn delete_many<I, K>(&self, name: &str, keys: I) -> Result<usize>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let namespace = self.namespace(name).await?;
        let mut store = namespace.store().write().await;
        Ok(keys
            .into_iter()
            .filter(|key| store.delete(key.as_ref()))
            .count())
    }

    // == Stats ==
    pub async fn stats(&self, name: &str) -> Option<CacheStats> {
        let namespace = self.namespace(name).await.ok()?;
        Some(namespace.stats().await)
    }

    /// Stats snapshot of every namespace, keyed by name.
    pub async fn all_stats(&self) -> BTreeMap<String, CacheStats> {
        let mut all = BTreeMap::new();
        for (name, store) in self.stores().await {
            let stats = store.read().await.stats();
            all.insert(name, stats);
        }
        all
    }

    // == Sweep Expired ==
    /// Removes expired entries from every namespace.
    ///
    /// Each namespace is locked and swept on its own. Returns the removed count per namespace.
    pub async fn sweep_expired(&self) -> BTreeMap<String, usize> {
        let mut removed = BTreeMap::new();
        for (name, store) in self.stores().await {
            let count = store.write().await.sweep_expired();
            if count > 0 {
                info!(namespace = %name, removed = count, "swept expired entries");
            }
            removed.insert(name, count);
        }
        removed
    }

    /// Clones the namespace table so no registry lock is held while stores are locked.
    async fn stores(&self) -> Vec<(String, SharedStore<V>)> {
        self.namespaces
            .read()
            .await
            .iter()
            .map(|(name, store)| (name.clone(), Arc::clone(store)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvictionStrategy, ManualClock};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> (CacheRegistry<i64>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (CacheRegistry::with_clock(clock.clone()), clock)
    }

    fn config(max_size: usize) -> CacheConfig {
        CacheConfig::lru(Duration::from_millis(1_000), max_size)
    }

    #[tokio::test]
    async fn test_unknown_namespace() {
        let (registry, _) = registry();

        let result = registry.namespace("nope").await;
        assert!(matches!(result, Err(CacheError::NamespaceNotFound(name)) if name == "nope"));
        assert!(registry.stats("nope").await.is_none());
        assert!(registry.set_many("nope", vec![("a", 1)], None).await.is_err());
        assert!(registry.get_many("nope", ["a"]).await.is_err());
        assert!(registry.delete_many("nope", ["a"]).await.is_err());
    }

    #[tokio::test]
    async fn test_create_namespace_replaces_store() {
        let (registry, _) = registry();
        registry.create_namespace("ns", config(10)).await;
        registry.namespace("ns").await.unwrap().set("a", 1, None).await;

        registry.create_namespace("ns", config(5)).await;
        let ns = registry.namespace("ns").await.unwrap();
        assert!(ns.is_empty().await);
        assert_eq!(ns.config().await.max_size, 5);
    }

    #[tokio::test]
    async fn test_recreated_namespace_is_shared_with_old_handles() {
        let (registry, clock) = registry();
        registry.create_namespace("api", config(10)).await;
        let handle = registry.namespace("api").await.unwrap();
        handle.set("stale", 1, None).await;

        registry.create_namespace("api", config(10)).await;
        assert_eq!(handle.peek("stale").await, None);

        handle.set("k", 1, None).await;
        let fresh = registry.namespace("api").await.unwrap();
        assert_eq!(fresh.get("k").await, Some(1));
        assert_eq!(registry.stats("api").await.unwrap().size, 1);

        clock.advance(1_001);
        assert_eq!(registry.sweep_expired().await["api"], 1);
        assert!(handle.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_or_compute_lands_in_recreated_namespace() {
        let (registry, _) = registry();
        registry.create_namespace("ns", config(10)).await;
        let registry_ref = &registry;

        let value = registry
            .get_or_compute(
                "ns",
                "k",
                move || async move {
                    registry_ref.create_namespace("ns", config(3)).await;
                    Ok(9)
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(value, 9);
        let ns = registry.namespace("ns").await.unwrap();
        assert_eq!(ns.peek("k").await, Some(9));
        assert_eq!(ns.config().await.max_size, 3);
    }

    #[tokio::test]
    async fn test_registries_are_independent() {
        let (first, _) = registry();
        let (second, _) = registry();
        first.create_namespace("ns", config(10)).await;

        assert!(first.contains("ns").await);
        assert!(!second.contains("ns").await);
        assert!(first.clone().contains("ns").await);
    }

    #[tokio::test]
    async fn test_get_or_compute() {
        let (registry, _) = registry();
        registry.create_namespace("ns", config(10)).await;

        let value = registry
            .get_or_compute("ns", "k", || async { Ok(42) }, None)
            .await
            .unwrap();
        assert_eq!(value, 42);

        let calls = AtomicUsize::new(0);
        let calls_ref = &calls;
        let value = registry
            .get_or_compute(
                "ns",
                "k",
                move || async move {
                    calls_ref.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let stats = registry.stats("ns").await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_get_or_compute_propagates_producer_error() {
        let (registry, _) = registry();
        registry.create_namespace("ns", config(10)).await;

        let result = registry
            .get_or_compute("ns", "k", || async { Err(anyhow::anyhow!("backend down")) }, None)
            .await;

        assert!(matches!(result, Err(CacheError::Producer(_))));
        assert!(registry.namespace("ns").await.unwrap().peek("k").await.is_none());
    }

    #[tokio::test]
    async fn test_get_or_compute_uses_ttl_override() {
        let (registry, clock) = registry();
        registry.create_namespace("ns", config(10)).await;

        registry
            .get_or_compute("ns", "k", || async { Ok(1) }, Some(Duration::from_millis(5)))
            .await
            .unwrap();
        clock.advance(6);

        assert_eq!(registry.namespace("ns").await.unwrap().get("k").await, None);
    }

    #[tokio::test]
    async fn test_batch_operations() {
        let (registry, _) = registry();
        registry.create_namespace("ns", config(10)).await;

        registry
            .set_many("ns", vec![("a", 1), ("b", 2), ("c", 3)], None)
            .await
            .unwrap();

        let values = registry.get_many("ns", ["a", "c", "zz"]).await.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values["a"], Some(1));
        assert_eq!(values["c"], Some(3));
        assert_eq!(values["zz"], None);

        let deleted = registry.delete_many("ns", ["a", "b", "zz"]).await.unwrap();
        assert_eq!(deleted, 2);

        let ns = registry.namespace("ns").await.unwrap();
        assert_eq!(ns.keys().await, vec!["c".to_string()]);
    }

    #[tokio::test]
    async fn test_set_many_respects_capacity() {
        let (registry, _) = registry();
        registry
            .create_namespace("ns", CacheConfig::fifo(Duration::from_secs(1), 2))
            .await;

        registry
            .set_many("ns", (0..5).map(|i| (format!("k{i}"), i)), None)
            .await
            .unwrap();

        let ns = registry.namespace("ns").await.unwrap();
        assert_eq!(ns.keys().await, vec!["k3".to_string(), "k4".to_string()]);
        assert_eq!(ns.stats().await.evictions, 3);
    }

    #[tokio::test]
    async fn test_sweep_expired_across_namespaces() {
        let (registry, clock) = registry();
        registry.create_namespace("short", config(10)).await;
        registry
            .create_namespace("long", CacheConfig::lfu(Duration::from_secs(60), 10))
            .await;

        registry.namespace("short").await.unwrap().set("a", 1, None).await;
        registry.namespace("long").await.unwrap().set("b", 2, None).await;
        clock.advance(2_000);

        let removed = registry.sweep_expired().await;
        assert_eq!(removed["short"], 1);
        assert_eq!(removed["long"], 0);

        let stats = registry.all_stats().await;
        assert_eq!(stats["short"].size, 0);
        assert_eq!(stats["short"].misses, 0);
        assert_eq!(stats["long"].size, 1);
    }

    #[tokio::test]
    async fn test_reconfigure() {
        let (registry, _) = registry();
        registry.create_namespace("ns", config(10)).await;
        registry
            .set_many("ns", vec![("a", 1), ("b", 2), ("c", 3)], None)
            .await
            .unwrap();

        let evicted = registry
            .reconfigure("ns", CacheConfig::new(Duration::from_secs(1), 1, EvictionStrategy::Fifo))
            .await
            .unwrap();

        assert_eq!(evicted, 2);
        let ns = registry.namespace("ns").await.unwrap();
        assert_eq!(ns.keys().await, vec!["c".to_string()]);
        assert!(registry.reconfigure("missing", config(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_with_presets() {
        let registry: CacheRegistry = CacheRegistry::with_presets(Arc::new(ManualClock::new(0))).await;
        assert_eq!(
            registry.namespaces().await,
            vec!["api", "images", "preferences", "search", "static"]
        );
        assert_eq!(registry.all_stats().await.len(), 5);
    }
}
