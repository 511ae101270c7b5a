//! Record-store model and contract.
//!
//! The production record store is an external service (ORM-backed rows);
//! the engine only needs each row's owner id and its per-variant stored
//! file name. Rows arrive raw: a corrupt row may lack its owner id, which
//! the engine skips and counts instead of failing the audit.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use ark_types::{OwnerId, VariantId};

use crate::error::{ReconcileError, ReconcileResult};

/// Per-variant stored-file field of a record row.
///
/// Absence is a record-level fact, explicitly marked; it is never inferred
/// from what happens to sit in storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FileField {
    /// The record owns this stored file name.
    Assigned(String),
    /// The record has no file for this variant.
    Absent,
}

impl FileField {
    /// The assigned name, if any.
    pub fn as_assigned(&self) -> Option<&str> {
        match self {
            Self::Assigned(name) => Some(name),
            Self::Absent => None,
        }
    }

    /// Returns `true` for the explicit absent marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<Option<String>> for FileField {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(name) => Self::Assigned(name),
            None => Self::Absent,
        }
    }
}

impl From<FileField> for Option<String> {
    fn from(field: FileField) -> Self {
        match field {
            FileField::Assigned(name) => Some(name),
            FileField::Absent => None,
        }
    }
}

/// One raw record-store row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Raw owner id; `None` marks a corrupt row that cannot be classified.
    pub owner: Option<u64>,
    /// Stored file name (or absent marker) per variant. A variant with no
    /// entry at all is treated the same as an explicit absent marker.
    pub files: BTreeMap<VariantId, FileField>,
}

impl AssetRecord {
    /// A well-formed row for the given owner with no files yet.
    pub fn new(owner: u64) -> Self {
        Self {
            owner: Some(owner),
            files: BTreeMap::new(),
        }
    }

    /// Builder: assign a file name for a variant.
    pub fn with_file(mut self, variant: VariantId, name: impl Into<String>) -> Self {
        self.files.insert(variant, FileField::Assigned(name.into()));
        self
    }

    /// Builder: mark a variant explicitly absent.
    pub fn with_absent(mut self, variant: VariantId) -> Self {
        self.files.insert(variant, FileField::Absent);
        self
    }

    /// The field for a variant; missing entries read as absent.
    pub fn field(&self, variant: VariantId) -> &FileField {
        self.files.get(&variant).unwrap_or(&FileField::Absent)
    }
}

/// Read/write access to the record store.
///
/// `load` returns a point-in-time snapshot of all rows; `assign` writes a
/// chosen file name back to one row's variant field (the re-link repair).
pub trait RecordStore: Send + Sync {
    /// Snapshot all rows.
    fn load(&self) -> ReconcileResult<Vec<AssetRecord>>;

    /// Write a file name into the row owned by `owner`.
    fn assign(&self, owner: OwnerId, variant: VariantId, name: &str) -> ReconcileResult<()>;
}

/// In-memory record store for tests and embedding.
pub struct InMemoryRecordStore {
    rows: RwLock<Vec<AssetRecord>>,
}

impl InMemoryRecordStore {
    /// Create a store holding the given rows.
    pub fn new(rows: Vec<AssetRecord>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Current row for an owner, if any.
    pub fn row(&self, owner: u64) -> Option<AssetRecord> {
        self.rows
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|row| row.owner == Some(owner))
            .cloned()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn load(&self) -> ReconcileResult<Vec<AssetRecord>> {
        Ok(self.rows.read().expect("lock poisoned").clone())
    }

    fn assign(&self, owner: OwnerId, variant: VariantId, name: &str) -> ReconcileResult<()> {
        let mut rows = self.rows.write().expect("lock poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.owner == Some(owner.get()))
            .ok_or(ReconcileError::UnknownOwner {
                owner: owner.get(),
            })?;
        row.files
            .insert(variant, FileField::Assigned(name.to_string()));
        Ok(())
    }
}
