//! Snapshot Files
//!
//! Stores one JSON record per namespace as `<dir>/<namespace>.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::registry::{CacheRegistry, CacheValue};

const SNAPSHOT_EXTENSION: &str = "json";

/// Path of a namespace's snapshot file inside `dir`.
pub fn snapshot_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{SNAPSHOT_EXTENSION}"))
}

// == Save ==
/// Writes one namespace's record, creating `dir` if needed.
pub async fn save_snapshot<V: CacheValue>(
    registry: &CacheRegistry<V>,
    dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let json = registry.export_json(name).await?;
    tokio::fs::create_dir_all(dir).await?;

    let path = snapshot_path(dir, name);
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

/// Writes a record for every namespace. Returns how many were written.
pub async fn save_all<V: CacheValue>(registry: &CacheRegistry<V>, dir: &Path) -> Result<usize> {
    let names = registry.namespaces().await;
    for name in &names {
        save_snapshot(registry, dir, name).await?;
    }
    info!(dir = %dir.display(), namespaces = names.len(), "snapshots saved");
    Ok(names.len())
}

// == Load ==
/// Imports `name` from its snapshot file.
///
/// Returns `Ok(None)` when there is no file for the namespace.
pub async fn load_snapshot<V: CacheValue>(
    registry: &CacheRegistry<V>,
    dir: &Path,
    name: &str,
) -> Result<Option<usize>> {
    let path = snapshot_path(dir, name);
    let json = match tokio::fs::read_to_string(&path).await {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    registry.import_json(name, &json).await.map(Some)
}

/// Imports every `*.json` file in `dir`, naming namespaces after file stems.
///
/// A file that fails to load is logged and skipped. Returns the number of
/// namespaces restored; a missing directory restores nothing.
pub async fn restore_all<V: CacheValue>(registry: &CacheRegistry<V>, dir: &Path) -> Result<usize> {
    let mut reader = match tokio::fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err.into()),
    };

    let mut names = Vec::new();
    while let Some(dir_entry) = reader.next_entry().await? {
        let path = dir_entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();

    let mut restored = 0;
    for name in names {
        match load_snapshot(registry, dir, &name).await {
            Ok(Some(entries)) => {
                info!(namespace = %name, entries, "snapshot restored");
                restored += 1;
            }
            Ok(None) => {}
            Err(err) => warn!(namespace = %name, error = %err, "snapshot restore failed"),
        }
    }
    Ok(restored)
}
