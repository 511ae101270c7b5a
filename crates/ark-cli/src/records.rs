//! JSON-file-backed record store adapter.
//!
//! The production record store is an external ORM-backed service; the CLI
//! stands one in from a JSON file of rows so maintenance runs can work
//! against exported data.

use std::fs;
use std::path::PathBuf;

use ark_reconcile::{AssetRecord, FileField, ReconcileError, ReconcileResult, RecordStore};
use ark_types::{OwnerId, VariantId};

/// Record store reading and writing a JSON array of [`AssetRecord`] rows.
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    /// Use the records file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> ReconcileResult<Vec<AssetRecord>> {
        let text = fs::read_to_string(&self.path).map_err(|e| ReconcileError::Records {
            reason: format!("cannot read {}: {e}", self.path.display()),
        })?;
        serde_json::from_str(&text).map_err(|e| ReconcileError::Records {
            reason: format!("cannot parse {}: {e}", self.path.display()),
        })
    }

    fn write(&self, rows: &[AssetRecord]) -> ReconcileResult<()> {
        let text = serde_json::to_string_pretty(rows).map_err(|e| ReconcileError::Records {
            reason: format!("cannot serialize records: {e}"),
        })?;
        fs::write(&self.path, text).map_err(|e| ReconcileError::Records {
            reason: format!("cannot write {}: {e}", self.path.display()),
        })
    }
}

impl RecordStore for JsonRecordStore {
    fn load(&self) -> ReconcileResult<Vec<AssetRecord>> {
        self.read()
    }

    fn assign(&self, owner: OwnerId, variant: VariantId, name: &str) -> ReconcileResult<()> {
        let mut rows = self.read()?;
        let row = rows
            .iter_mut()
            .find(|row| row.owner == Some(owner.get()))
            .ok_or(ReconcileError::UnknownOwner {
                owner: owner.get(),
            })?;
        row.files
            .insert(variant, FileField::Assigned(name.to_string()));
        self.write(&rows)
    }
}
