//! Namespace Cache daemon
//!
//! Hosts the default cache namespaces for the lifetime of the process,
//! sweeping expired entries and persisting snapshots across restarts.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use namespace_cache::cache::SystemClock;
use namespace_cache::persistence;
use namespace_cache::{spawn_janitor, CacheRegistry, Config};

/// Main entry point for the cache daemon.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the registry, with default namespaces unless disabled
/// 4. Restore snapshots from the snapshot directory, if configured
/// 5. Start the janitor
/// 6. On SIGINT/SIGTERM stop the janitor and write snapshots
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "namespace_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting namespace cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: sweep_interval={}s, snapshot_dir={:?}, presets={}",
        config.sweep_interval, config.snapshot_dir, config.presets
    );

    let clock = Arc::new(SystemClock);
    let registry: CacheRegistry = if config.presets {
        CacheRegistry::with_presets(clock).await
    } else {
        CacheRegistry::with_clock(clock)
    };
    info!(namespaces = ?registry.namespaces().await, "registry initialized");

    if let Some(dir) = &config.snapshot_dir {
        let restored = persistence::restore_all(&registry, dir)
            .await
            .with_context(|| format!("reading snapshot directory {}", dir.display()))?;
        info!("Restored {} namespace snapshots", restored);
    }

    let janitor = spawn_janitor(registry.clone(), Duration::from_secs(config.sweep_interval));

    shutdown_signal().await?;

    janitor.abort();
    warn!("Janitor aborted");

    for (name, stats) in registry.all_stats().await {
        info!(
            namespace = %name,
            size = stats.size,
            hits = stats.hits,
            misses = stats.misses,
            hit_rate = stats.hit_rate,
            memory_usage = stats.memory_usage,
            "final stats"
        );
    }

    if let Some(dir) = &config.snapshot_dir {
        persistence::save_all(&registry, dir)
            .await
            .with_context(|| format!("writing snapshots to {}", dir.display()))?;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("installing Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("installing SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<anyhow::Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("Received Ctrl+C, initiating shutdown...");
        }
        result = terminate => {
            result?;
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
    Ok(())
}
