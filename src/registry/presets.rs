//! Default namespaces created at startup.

use std::time::Duration;

use crate::cache::CacheConfig;

/// API responses
pub const API: &str = "api";
/// Search results
pub const SEARCH: &str = "search";
/// User preferences
pub const PREFERENCES: &str = "preferences";
/// Static reference data
pub const STATIC: &str = "static";
/// Media references
pub const IMAGES: &str = "images";

const MINUTE: u64 = 60;

/// Name and configuration of every default namespace.
pub fn default_namespaces() -> Vec<(&'static str, CacheConfig)> {
    vec![
        (API, CacheConfig::lru(Duration::from_secs(5 * MINUTE), 100)),
        (SEARCH, CacheConfig::lru(Duration::from_secs(2 * MINUTE), 50)),
        (PREFERENCES, CacheConfig::lfu(Duration::from_secs(30 * MINUTE), 20)),
        (STATIC, CacheConfig::lfu(Duration::from_secs(60 * MINUTE), 200)),
        (IMAGES, CacheConfig::lru(Duration::from_secs(24 * 60 * MINUTE), 50)),
    ]
}
