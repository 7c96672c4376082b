// src/store/snapshot.rs

//! TOML snapshot persistence for [`MemoryStore`].

use std::fs;
use std::path::Path;

use tracing::debug;

use super::memory::{MemoryStore, StoreData};
use crate::errors::Result;

/// Load a store from a snapshot file. A missing file yields an empty store.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<MemoryStore> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot found; starting with an empty store");
        return Ok(MemoryStore::new());
    }

    let contents = fs::read_to_string(path)?;
    let data: StoreData = toml::from_str(&contents)?;
    debug!(
        path = %path.display(),
        frames = data.frames.len(),
        cycles = data.cycles.len(),
        "snapshot loaded"
    );
    Ok(MemoryStore::from_data(data))
}

/// Write the store's current tables to `path`, creating parent directories.
pub fn save_snapshot(store: &MemoryStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let data = store.data()?;
    let contents = toml::to_string_pretty(&data)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::FrameRow;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use uuid::Uuid;

    #[test]
    fn missing_snapshot_is_an_empty_store() {
        let dir = tempdir().unwrap();
        let store = load_snapshot(dir.path().join("absent.toml")).unwrap();
        assert_eq!(store.data().unwrap(), StoreData::default());
    }

    #[test]
    fn saved_snapshot_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.toml");

        let store = MemoryStore::from_data(StoreData {
            frames: vec![FrameRow {
                id: Uuid::new_v4(),
                reference: "Racle-2026-01".into(),
                created_on: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
                cell_count: 20,
                note: "printemps".into(),
            }],
            ..StoreData::default()
        });

        save_snapshot(&store, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.data().unwrap(), store.data().unwrap());
    }
}
