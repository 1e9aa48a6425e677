//! Cache Warming
//!
//! Best-effort pre-population: every producer runs as its own task and a
//! failing producer only loses its own entry.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::registry::{CacheRegistry, CacheValue};

/// Boxed asynchronous value producer.
pub type Producer<V> = Pin<Box<dyn Future<Output = anyhow::Result<V>> + Send + 'static>>;

// == Warm Entry ==
/// One key to pre-populate.
pub struct WarmEntry<V> {
    pub key: String,
    pub producer: Producer<V>,
    pub ttl: Option<Duration>,
}

impl<V> WarmEntry<V> {
    pub fn new<F>(key: impl Into<String>, producer: F) -> Self
    where
        F: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        Self {
            key: key.into(),
            producer: Box::pin(producer),
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

impl<V: CacheValue> CacheRegistry<V> {
    // == Warm ==
    /// Runs every producer concurrently and stores the successful results.
    ///
    /// Results are inserted in input order. Producer errors and panics are
    /// logged and skipped. Returns the number of entries stored; only a
    /// missing namespace fails the call.
    pub async fn warm(&self, name: &str, entries: Vec<WarmEntry<V>>) -> Result<usize> {
        let namespace = self.namespace(name).await?;

        let tasks: Vec<_> = entries
            .into_iter()
            .map(|entry| (entry.key, entry.ttl, tokio::spawn(entry.producer)))
            .collect();
        let requested = tasks.len();

        let mut warmed = 0;
        for (key, ttl, task) in tasks {
            match task.await {
                Ok(Ok(value)) => {
                    namespace.set(key, value, ttl).await;
                    warmed += 1;
                }
                Ok(Err(err)) => {
                    warn!(namespace = %name, key = %key, error = %err, "warm producer failed");
                }
                Err(err) => {
                    warn!(namespace = %name, key = %key, error = %err, "warm producer panicked");
                }
            }
        }

        info!(namespace = %name, warmed, requested, "cache warmed");
        Ok(warmed)
    }
}
