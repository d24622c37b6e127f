//! Lock-free in-memory spot store with an optional JSON snapshot

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use uuid::Uuid;

use super::{SpotChange, SpotStore, StoreState};
use crate::error::Result;
use crate::types::Spot;

/// Concurrent spot store.
///
/// Reads never block. When a snapshot path is configured, every mutation
/// rewrites the snapshot file; rewrites are serialized.
pub struct MemoryStore {
    spots: Arc<DashMap<Uuid, Spot>>,
    snapshot: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    /// Creates an empty, purely in-memory store
    pub fn new() -> Self {
        Self {
            spots: Arc::new(DashMap::new()),
            snapshot: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Opens a store backed by a JSON snapshot file.
    ///
    /// A missing file starts an empty store; the file is created on the first
    /// mutation.
    ///
    /// # Arguments
    /// * `path` - Snapshot file holding a JSON array of spots
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let spots = DashMap::new();

        if path.exists() {
            let data = fs::read(&path)?;
            if !data.is_empty() {
                let loaded: Vec<Spot> = serde_json::from_slice(&data)?;
                for spot in loaded {
                    spots.insert(spot.id, spot);
                }
            }
            tracing::info!(path = %path.display(), spots = spots.len(), "loaded spot snapshot");
        }

        Ok(Self {
            spots: Arc::new(spots),
            snapshot: Some(path),
            write_lock: Mutex::new(()),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut spots: Vec<Spot> = self.spots.iter().map(|entry| entry.value().clone()).collect();
        spots.sort_by_key(|spot| spot.created_at);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&spots)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotStore for MemoryStore {
    fn insert(&self, spot: Spot) -> Result<Spot> {
        self.spots.insert(spot.id, spot.clone());
        self.persist()?;
        Ok(spot)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Spot>> {
        Ok(self.spots.get(id).map(|entry| entry.value().clone()))
    }

    fn list(&self) -> Result<Vec<Spot>> {
        Ok(self.spots.iter().map(|entry| entry.value().clone()).collect())
    }

    fn modify(&self, id: &Uuid, change: SpotChange<'_>) -> Result<Option<Spot>> {
        let changed = {
            let Some(mut entry) = self.spots.get_mut(id) else {
                return Ok(None);
            };
            change(entry.value_mut())?;
            entry.value().clone()
        };
        // the shard guard must be released before the snapshot iterates the map
        self.persist()?;
        Ok(Some(changed))
    }

    fn remove(&self, id: &Uuid) -> Result<Option<Spot>> {
        let removed = self.spots.remove(id).map(|(_, spot)| spot);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.spots.len())
    }

    fn state(&self) -> StoreState {
        StoreState::Connected
    }

    fn backend(&self) -> String {
        match self.snapshot_path() {
            Some(path) => format!("memory (snapshot: {})", path.display()),
            None => "memory".to_string(),
        }
    }
}
