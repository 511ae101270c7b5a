use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::FileStore;

/// In-memory file store for tests and embedding.
///
/// Only locations created with [`add_location`](Self::add_location) exist;
/// listing any other location fails with `LocationUnavailable`, mirroring
/// the filesystem-backed store's missing-vs-empty distinction.
pub struct InMemoryFileStore {
    locations: RwLock<BTreeMap<String, BTreeSet<String>>>,
}

impl InMemoryFileStore {
    /// Create an empty store with no locations.
    pub fn new() -> Self {
        Self {
            locations: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create an (empty) location.
    pub fn add_location(&self, location: &str) {
        self.locations
            .write()
            .expect("lock poisoned")
            .entry(location.to_string())
            .or_default();
    }

    /// Place a file into a location, creating the location if needed.
    pub fn insert_file(&self, location: &str, name: &str) {
        self.locations
            .write()
            .expect("lock poisoned")
            .entry(location.to_string())
            .or_default()
            .insert(name.to_string());
    }

    /// Total files across all locations.
    pub fn total_files(&self) -> usize {
        self.locations
            .read()
            .expect("lock poisoned")
            .values()
            .map(BTreeSet::len)
            .sum()
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for InMemoryFileStore {
    fn list(&self, location: &str) -> StoreResult<BTreeSet<String>> {
        let map = self.locations.read().expect("lock poisoned");
        map.get(location)
            .cloned()
            .ok_or_else(|| StoreError::LocationUnavailable {
                location: location.to_string(),
                reason: "does not exist".to_string(),
            })
    }

    fn exists(&self, location: &str, name: &str) -> StoreResult<bool> {
        let map = self.locations.read().expect("lock poisoned");
        Ok(map.get(location).is_some_and(|files| files.contains(name)))
    }

    fn delete(&self, location: &str, name: &str) -> StoreResult<bool> {
        let mut map = self.locations.write().expect("lock poisoned");
        Ok(map
            .get_mut(location)
            .map(|files| files.remove(name))
            .unwrap_or(false))
    }

    fn copy(
        &self,
        location: &str,
        name: &str,
        dest_location: &str,
        dest_name: &str,
    ) -> StoreResult<()> {
        let mut map = self.locations.write().expect("lock poisoned");
        let present = map
            .get(location)
            .is_some_and(|files| files.contains(name));
        if !present {
            return Err(StoreError::LocationUnavailable {
                location: location.to_string(),
                reason: format!("no such file: {name}"),
            });
        }
        map.entry(dest_location.to_string())
            .or_default()
            .insert(dest_name.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.locations.read().expect("lock poisoned");
        f.debug_struct("InMemoryFileStore")
            .field("locations", &map.len())
            .field("files", &map.values().map(BTreeSet::len).sum::<usize>())
            .finish()
    }
}
