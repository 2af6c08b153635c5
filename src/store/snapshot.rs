//! Snapshot file persistence.
//!
//! Load never fails: a missing or unreadable snapshot yields an empty store.
//! Save writes to a temporary sibling file, syncs it, and renames it over the
//! target so readers never observe a half-written snapshot.

use crate::error::Result;
use crate::store::records::Snapshot;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Load a snapshot, falling back to an empty one on any failure.
pub fn load(path: &Path) -> Snapshot {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No snapshot at {}, starting empty", path.display());
            return Snapshot::default();
        }
        Err(e) => {
            warn!("Failed to read snapshot {}: {}; starting empty", path.display(), e);
            return Snapshot::default();
        }
    };

    let mut snapshot: Snapshot = match serde_json::from_str(&content) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Failed to parse snapshot {}: {}; starting empty", path.display(), e);
            return Snapshot::default();
        }
    };

    if snapshot.repair() {
        warn!(
            "Snapshot {} violated store invariants; counters raised to maxid={} lasttick={}",
            path.display(),
            snapshot.max_id,
            snapshot.last_tick
        );
    }

    info!(
        "Loaded snapshot from {}: {} items, maxid={}, lasttick={}",
        path.display(),
        snapshot.items.len(),
        snapshot.max_id,
        snapshot.last_tick
    );
    snapshot
}

/// Atomically write a snapshot to `path`.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_vec(snapshot)?;

    let temp_path = temp_path_for(path);
    let mut file = File::create(&temp_path)?;
    file.write_all(&data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    info!(
        "Saved snapshot to {}: {} items, maxid={}, lasttick={}",
        path.display(),
        snapshot.items.len(),
        snapshot.max_id,
        snapshot.last_tick
    );
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    name.push(".tmp");
    path.with_file_name(name)
}
