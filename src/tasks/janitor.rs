//! Janitor Task
//!
//! Background task that periodically sweeps expired entries out of every
//! registered namespace (active expiry).

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::registry::{CacheRegistry, CacheValue};

/// Sweep interval used when none is configured.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// Each pass locks one namespace at a time, so foreground operations on a
/// namespace never interleave with its sweep. Hit/miss counters are not touched.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let registry: CacheRegistry = CacheRegistry::new();
/// let janitor = spawn_janitor(registry.clone(), DEFAULT_SWEEP_INTERVAL);
/// // Later, during shutdown:
/// janitor.abort();
/// ```
pub fn spawn_janitor<V: CacheValue>(registry: CacheRegistry<V>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting janitor");

        loop {
            tokio::time::sleep(interval).await;

            let removed: usize = registry.sweep_expired().await.values().sum();
            if removed == 0 {
                debug!("janitor: no expired entries found");
            }
        }
    })
}
