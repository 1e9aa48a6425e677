//! Configuration Module
//!
//! Handles loading daemon configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::tasks::DEFAULT_SWEEP_INTERVAL;

/// Daemon configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Janitor sweep interval in seconds
    pub sweep_interval: u64,
    /// Directory holding `<namespace>.json` snapshots, if persistence is enabled
    pub snapshot_dir: Option<PathBuf>,
    /// Whether the default namespaces are created at startup
    pub presets: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SWEEP_INTERVAL` - Janitor interval in seconds (default: 60)
    /// - `CACHE_SNAPSHOT_DIR` - Snapshot directory (default: unset, no persistence)
    /// - `CACHE_PRESETS` - Create default namespaces (default: true)
    pub fn from_env() -> Self {
        Self {
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL.as_secs()),
            snapshot_dir: env::var("CACHE_SNAPSHOT_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            presets: env::var("CACHE_PRESETS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL.as_secs(),
            snapshot_dir: None,
            presets: true,
        }
    }
}
