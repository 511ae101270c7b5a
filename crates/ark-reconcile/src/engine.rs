//! The reconciliation pass: records vs. storage, per variant.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use ark_store::FileStore;
use ark_types::{OwnerId, VariantCatalog};

use crate::error::ReconcileResult;
use crate::records::{FileField, RecordStore};
use crate::report::{MissingKind, ReconciliationReport, VariantAudit};

/// Audits a record store's declared assets against a file store.
///
/// The record snapshot and the listings taken during one `run` are treated
/// as a consistent point-in-time pair; callers serialize maintenance runs
/// if the stores can mutate concurrently.
pub struct Reconciler<'a> {
    records: &'a dyn RecordStore,
    files: &'a dyn FileStore,
    catalog: &'a VariantCatalog,
}

impl<'a> Reconciler<'a> {
    /// Wire the engine to its collaborators.
    pub fn new(
        records: &'a dyn RecordStore,
        files: &'a dyn FileStore,
        catalog: &'a VariantCatalog,
    ) -> Self {
        Self {
            records,
            files,
            catalog,
        }
    }

    /// Run one reconciliation pass.
    ///
    /// A row without a usable owner id is skipped and counted, never fatal.
    /// An unavailable storage location is fatal: reporting it as empty
    /// would classify every declared file as missing and every audit
    /// consumer downstream would act on garbage.
    pub fn run(&self) -> ReconcileResult<ReconciliationReport> {
        let rows = self.records.load()?;

        let mut report = ReconciliationReport::new();
        report.total_records = rows.len() as u64;

        let mut classified = Vec::with_capacity(rows.len());
        for row in &rows {
            match row.owner.and_then(|value| OwnerId::new(value).ok()) {
                Some(owner) => classified.push((owner, row)),
                None => {
                    warn!(owner = ?row.owner, "skipping unclassifiable record row");
                    report.skipped_records += 1;
                }
            }
        }

        for spec in self.catalog.iter() {
            let listing = self.files.list(&spec.location)?;
            let mut audit = VariantAudit::new(spec.id);

            // declared name -> owner, for the set arithmetic below.
            let mut declared: BTreeMap<&str, u64> = BTreeMap::new();
            for (owner, row) in &classified {
                match row.field(spec.id) {
                    FileField::Assigned(name) => {
                        declared.insert(name.as_str(), owner.get());
                    }
                    FileField::Absent => {
                        audit
                            .missing
                            .insert(owner.get(), MissingKind::NotAssigned);
                    }
                }
            }

            for (name, owner) in &declared {
                if listing.contains(*name) {
                    audit.consistent += 1;
                } else {
                    audit.missing.insert(
                        *owner,
                        MissingKind::FileNotInStorage {
                            name: (*name).to_string(),
                        },
                    );
                }
            }

            for name in &listing {
                if !declared.contains_key(name.as_str()) {
                    audit.unassigned.insert(name.clone());
                }
            }

            debug!(
                variant = %spec.id,
                location = %spec.location,
                missing = audit.missing.len(),
                unassigned = audit.unassigned.len(),
                consistent = audit.consistent,
                "reconciled variant"
            );
            report.variants.insert(spec.id, audit);
        }

        Ok(report)
    }
}
