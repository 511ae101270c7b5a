use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::FileStore;

/// Filesystem-backed file store.
///
/// Locations are immediate subdirectories of the root; file names are
/// plain entries inside them. Nothing here walks recursively — the
/// contract is a single flat level per location.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn location_path(&self, location: &str) -> PathBuf {
        self.root.join(location)
    }

    fn file_path(&self, location: &str, name: &str) -> PathBuf {
        self.location_path(location).join(name)
    }

    fn unavailable(location: &str, reason: impl Into<String>) -> StoreError {
        StoreError::LocationUnavailable {
            location: location.to_string(),
            reason: reason.into(),
        }
    }
}

impl FileStore for LocalFileStore {
    fn list(&self, location: &str) -> StoreResult<BTreeSet<String>> {
        let path = self.location_path(location);
        if !path.exists() {
            return Err(Self::unavailable(location, "does not exist"));
        }
        if !path.is_dir() {
            return Err(Self::unavailable(location, "not a directory"));
        }

        let entries = fs::read_dir(&path)
            .map_err(|e| Self::unavailable(location, format!("unreadable: {e}")))?;

        let mut names = BTreeSet::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| Self::unavailable(location, format!("unreadable: {e}")))?;
            let file_type = entry
                .file_type()
                .map_err(|e| Self::unavailable(location, format!("unreadable: {e}")))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }
        debug!(location, files = names.len(), "listed location");
        Ok(names)
    }

    fn exists(&self, location: &str, name: &str) -> StoreResult<bool> {
        Ok(self.file_path(location, name).is_file())
    }

    fn delete(&self, location: &str, name: &str) -> StoreResult<bool> {
        match fs::remove_file(self.file_path(location, name)) {
            Ok(()) => {
                debug!(location, name, "deleted file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn copy(
        &self,
        location: &str,
        name: &str,
        dest_location: &str,
        dest_name: &str,
    ) -> StoreResult<()> {
        let dest_dir = self.location_path(dest_location);
        fs::create_dir_all(&dest_dir)?;
        fs::copy(
            self.file_path(location, name),
            dest_dir.join(dest_name),
        )?;
        Ok(())
    }
}
