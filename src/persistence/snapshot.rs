//! Snapshot Codec
//!
//! Exports a namespace's config and entries to a portable record and
//! imports such records back, dropping entries that expired in between.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{CacheConfig, CacheEntry};
use crate::error::{CacheError, Result};
use crate::registry::{CacheRegistry, CacheValue};

// == Cache Snapshot ==
/// Portable record of one namespace.
///
/// `entries` keeps insertion order and serializes as `[key, entry]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot<V> {
    pub config: CacheConfig,
    pub entries: Vec<(String, CacheEntry<V>)>,
    #[serde(default)]
    pub exported_at: u64,
}

impl<V: CacheValue> CacheSnapshot<V> {
    /// Parses a record from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json).map_err(malformed)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Parses a record from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let snapshot: Self = serde_json::from_value(value).map_err(malformed)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(CacheError::Serialization)
    }

    fn validate(&self) -> Result<()> {
        if self.config.max_size == 0 {
            return Err(CacheError::MalformedRecord(
                "config.maxSize must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn malformed(err: serde_json::Error) -> CacheError {
    CacheError::MalformedRecord(err.to_string())
}

impl<V: CacheValue> CacheRegistry<V> {
    // == Export ==
    /// Captures config and every present entry, expired ones included.
    pub async fn export(&self, name: &str) -> Result<CacheSnapshot<V>> {
        let namespace = self.namespace(name).await?;
        let store = namespace.store().read().await;

        let snapshot = CacheSnapshot {
            config: *store.config(),
            entries: store.entries(),
            exported_at: store.now(),
        };
        info!(namespace = %name, entries = snapshot.entries.len(), "namespace exported");
        Ok(snapshot)
    }

    pub async fn export_json(&self, name: &str) -> Result<String> {
        self.export(name).await?.to_json()
    }

    // == Import ==
    /// Restores a record into `name`, creating the namespace from the record's
    /// config if it does not exist yet.
    ///
    /// Only entries with `now - created_at < ttl` are inserted, keeping their
    /// recorded metadata. Returns the number of entries restored.
    pub async fn import(&self, name: &str, snapshot: CacheSnapshot<V>) -> Result<usize> {
        snapshot.validate()?;

        let store = self.get_or_create(name, snapshot.config).await;
        let mut store = store.write().await;
        let now = store.now();

        let total = snapshot.entries.len();
        let mut restored = 0;
        for (key, entry) in snapshot.entries {
            if entry.is_restorable(now) {
                store.restore(key, entry);
                restored += 1;
            }
        }

        info!(
            namespace = %name,
            restored,
            dropped = total - restored,
            "namespace imported"
        );
        Ok(restored)
    }

    /// Parses and imports a JSON record. A parse failure leaves the registry untouched.
    pub async fn import_json(&self, name: &str, json: &str) -> Result<usize> {
        let snapshot = CacheSnapshot::from_json(json)?;
        self.import(name, snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvictionStrategy, ManualClock};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn registry(clock: &Arc<ManualClock>) -> CacheRegistry<String> {
        CacheRegistry::with_clock(clock.clone())
    }

    #[tokio::test]
    async fn test_export_shape() {
        let clock = Arc::new(ManualClock::new(100));
        let registry = registry(&clock);
        registry
            .create_namespace("ns", CacheConfig::lru(Duration::from_millis(1_000), 10))
            .await;
        let ns = registry.namespace("ns").await.unwrap();
        ns.set("a", "one".to_string(), None).await;
        ns.set("b", "two".to_string(), Some(Duration::from_millis(50))).await;
        clock.advance(5);

        let json: serde_json::Value =
            serde_json::from_str(&registry.export_json("ns").await.unwrap()).unwrap();

        assert_eq!(json["config"], json!({"ttl": 1000, "maxSize": 10, "strategy": "LRU"}));
        assert_eq!(json["exportedAt"], 105);
        assert_eq!(json["entries"][0][0], "a");
        assert_eq!(json["entries"][1][0], "b");
        assert_eq!(json["entries"][1][1]["ttl"], 50);
        assert_eq!(json["entries"][1][1]["createdAt"], 100);
    }

    #[tokio::test]
    async fn test_export_includes_expired_entries() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = registry(&clock);
        registry
            .create_namespace("ns", CacheConfig::lru(Duration::from_millis(10), 10))
            .await;
        registry
            .namespace("ns")
            .await
            .unwrap()
            .set("old", "v".to_string(), None)
            .await;
        clock.advance(50);

        let snapshot = registry.export("ns").await.unwrap();
        assert_eq!(snapshot.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_import_creates_namespace_and_filters() {
        let clock = Arc::new(ManualClock::new(1_000));
        let registry = registry(&clock);
        let record = json!({
            "config": {"ttl": 500, "maxSize": 3, "strategy": "FIFO"},
            "entries": [
                ["fresh", {"value": "f", "createdAt": 900, "ttl": 500, "accessCount": 2, "lastAccessedAt": 950}],
                ["edge", {"value": "e", "createdAt": 500, "ttl": 500, "accessCount": 0, "lastAccessedAt": 500}],
                ["stale", {"value": "s", "createdAt": 100, "ttl": 10, "accessCount": 0, "lastAccessedAt": 100}]
            ],
            "exportedAt": 960
        });

        let restored = registry
            .import("imported", CacheSnapshot::from_value(record).unwrap())
            .await
            .unwrap();
        assert_eq!(restored, 1);

        let ns = registry.namespace("imported").await.unwrap();
        assert_eq!(ns.config().await.strategy, EvictionStrategy::Fifo);
        assert_eq!(ns.keys().await, vec!["fresh".to_string()]);

        let snapshot = registry.export("imported").await.unwrap();
        assert_eq!(snapshot.entries[0].1.access_count, 2);
        assert_eq!(snapshot.entries[0].1.created_at, 900);
    }

    #[tokio::test]
    async fn test_import_into_existing_keeps_its_config() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = registry(&clock);
        registry
            .create_namespace("ns", CacheConfig::lfu(Duration::from_secs(60), 1))
            .await;

        let snapshot = CacheSnapshot {
            config: CacheConfig::lru(Duration::from_secs(60), 10),
            entries: vec![
                ("a".to_string(), CacheEntry::new("1".to_string(), 1_000, 0)),
                ("b".to_string(), CacheEntry::new("2".to_string(), 1_000, 0)),
            ],
            exported_at: 0,
        };
        registry.import("ns", snapshot).await.unwrap();

        let ns = registry.namespace("ns").await.unwrap();
        assert_eq!(ns.config().await.max_size, 1);
        assert_eq!(ns.keys().await, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_record_leaves_namespace_untouched() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = registry(&clock);
        registry
            .create_namespace("ns", CacheConfig::lru(Duration::from_secs(60), 10))
            .await;
        registry
            .namespace("ns")
            .await
            .unwrap()
            .set("keep", "me".to_string(), None)
            .await;

        for bad in [
            "not json",
            r#"{"entries": []}"#,
            r#"{"config": {"ttl": 1, "maxSize": 1, "strategy": "RANDOM"}, "entries": []}"#,
            r#"{"config": {"ttl": 1, "maxSize": 0, "strategy": "LRU"}, "entries": []}"#,
            r#"{"config": {"ttl": 1, "maxSize": 1, "strategy": "LRU"}, "entries": [["k"]]}"#,
        ] {
            let result = registry.import_json("ns", bad).await;
            assert!(matches!(result, Err(CacheError::MalformedRecord(_))), "{bad}");
        }

        let result = registry.import_json("fresh", "[]").await;
        assert!(matches!(result, Err(CacheError::MalformedRecord(_))));
        assert!(!registry.contains("fresh").await);

        let ns = registry.namespace("ns").await.unwrap();
        assert_eq!(ns.keys().await, vec!["keep".to_string()]);
    }

    #[tokio::test]
    async fn test_export_unknown_namespace() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = registry(&clock);
        assert!(matches!(
            registry.export("nope").await,
            Err(CacheError::NamespaceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_export_json_unencodable_value() {
        use std::collections::HashMap;

        let registry: CacheRegistry<HashMap<Vec<u8>, i32>> =
            CacheRegistry::with_clock(Arc::new(ManualClock::new(0)));
        registry
            .create_namespace("ns", CacheConfig::lru(Duration::from_secs(1), 10))
            .await;
        let value = HashMap::from([(vec![1u8, 2], 3)]);
        registry.namespace("ns").await.unwrap().set("k", value, None).await;

        let result = registry.export_json("ns").await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
        assert_eq!(registry.export("ns").await.unwrap().entries.len(), 1);
    }
}
