//! Storage reconciliation for ARK.
//!
//! Audits the set of assets a record store claims to own against the
//! actual contents of a file store, classifying divergences per variant:
//!
//! - **missing** — a record declares a file storage does not contain, or
//!   carries no assignment at all;
//! - **unassigned** — a file sits in storage with no owning record;
//! - **consistent** — declared and present.
//!
//! The audit is a pure function of its two inputs; every collection in the
//! report is ordered, so repeated runs over unchanged inputs render
//! byte-identical output. Repair actions (re-linking the newest matching
//! unassigned file, pruning unassigned files) are idempotent and
//! dry-run-capable, with per-item failure isolation.

pub mod engine;
pub mod error;
pub mod records;
pub mod repair;
pub mod report;

pub use engine::Reconciler;
pub use error::{ReconcileError, ReconcileResult};
pub use records::{AssetRecord, FileField, InMemoryRecordStore, RecordStore};
pub use repair::{link_missing_record, remove_unassigned, select_replacement, LinkOutcome, RemovalOutcome};
pub use report::{MissingKind, ReconciliationReport, VariantAudit};
