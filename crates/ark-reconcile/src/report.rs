//! The reconciliation report: what diverged, per variant.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde::Serialize;

use ark_types::{Catalog, VariantId};

/// Why a record counts as missing its file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MissingKind {
    /// The record declares a file name storage does not contain.
    FileNotInStorage {
        /// The declared name.
        name: String,
    },
    /// The record's field is explicitly absent.
    NotAssigned,
}

/// Audit result for one variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariantAudit {
    /// The audited variant.
    pub variant: VariantId,
    /// Records missing their file, keyed by owner id.
    pub missing: BTreeMap<u64, MissingKind>,
    /// Files present in storage with no owning record.
    pub unassigned: BTreeSet<String>,
    /// Declared files that storage does contain.
    pub consistent: u64,
}

impl VariantAudit {
    /// An empty audit for a variant.
    pub fn new(variant: VariantId) -> Self {
        Self {
            variant,
            missing: BTreeMap::new(),
            unassigned: BTreeSet::new(),
            consistent: 0,
        }
    }

    /// Returns `true` if nothing diverged for this variant.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unassigned.is_empty()
    }
}

/// Complete result of one reconciliation pass.
///
/// A pure function of the record snapshot and the directory listings:
/// recomputing from the same inputs yields an equal report, and `render`
/// output is byte-identical run to run (all collections are ordered).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Rows inspected, including skipped ones.
    pub total_records: u64,
    /// Corrupt rows (no usable owner id) left out of classification.
    pub skipped_records: u64,
    /// Per-variant audits, in variant-id order.
    pub variants: BTreeMap<VariantId, VariantAudit>,
}

impl ReconciliationReport {
    /// An empty report.
    pub fn new() -> Self {
        Self {
            total_records: 0,
            skipped_records: 0,
            variants: BTreeMap::new(),
        }
    }

    /// The audit for one variant, if that variant was reconciled.
    pub fn variant(&self, id: VariantId) -> Option<&VariantAudit> {
        self.variants.get(&id)
    }

    /// Returns `true` if no variant diverged and no row was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped_records == 0 && self.variants.values().all(VariantAudit::is_clean)
    }

    /// Total missing entries across variants.
    pub fn missing_count(&self) -> usize {
        self.variants.values().map(|a| a.missing.len()).sum()
    }

    /// Total unassigned files across variants.
    pub fn unassigned_count(&self) -> usize {
        self.variants.values().map(|a| a.unassigned.len()).sum()
    }

    /// Render the operator-facing text report.
    ///
    /// Deterministic given identical inputs: counts first, then itemized
    /// missing records and unassigned files (with decoded token details),
    /// then the follow-up commands that apply — sections appear only when
    /// they have content.
    pub fn render(&self, catalog: &Catalog) -> String {
        let rule_heavy = "=".repeat(50);
        let rule_light = "-".repeat(50);
        let mut out = String::new();

        let _ = writeln!(out, "{rule_heavy}");
        let _ = writeln!(out, "Storage reconciliation report");
        let _ = writeln!(out, "{rule_light}");
        let _ = writeln!(out, "Records inspected: {}", self.total_records);
        if self.skipped_records > 0 {
            let _ = writeln!(out, "Records skipped (unclassifiable): {}", self.skipped_records);
        }
        for audit in self.variants.values() {
            let _ = writeln!(
                out,
                "Variant {}: {} missing, {} unassigned, {} consistent",
                self.variant_label(catalog, audit.variant),
                audit.missing.len(),
                audit.unassigned.len(),
                audit.consistent
            );
        }

        for audit in self.variants.values() {
            if !audit.missing.is_empty() {
                let _ = writeln!(out, "{rule_heavy}");
                let _ = writeln!(
                    out,
                    "Records missing their file — variant {}",
                    self.variant_label(catalog, audit.variant)
                );
                let _ = writeln!(out, "{rule_light}");
                for (owner, kind) in &audit.missing {
                    match kind {
                        MissingKind::NotAssigned => {
                            let _ = writeln!(out, "- owner {owner}: no file assigned");
                        }
                        MissingKind::FileNotInStorage { name } => {
                            let _ = writeln!(
                                out,
                                "- owner {owner}: declared {name:?} not in storage"
                            );
                        }
                    }
                }
            }
            if !audit.unassigned.is_empty() {
                let _ = writeln!(out, "{rule_heavy}");
                let _ = writeln!(
                    out,
                    "Unassigned files — variant {}",
                    self.variant_label(catalog, audit.variant)
                );
                let _ = writeln!(out, "{rule_light}");
                for name in &audit.unassigned {
                    match ark_codec::decode(name) {
                        Ok(id) => {
                            let app = catalog
                                .apps
                                .name(id.app)
                                .unwrap_or("unknown application");
                            let _ = writeln!(out, "- {name} ({app}, {id})");
                        }
                        Err(e) => {
                            let _ = writeln!(out, "- {name} (undecodable: {e})");
                        }
                    }
                }
            }
        }

        if !self.is_clean() {
            let _ = writeln!(out, "{rule_heavy}");
            let _ = writeln!(out, "What next?");
            if self.missing_count() > 0 {
                let _ = writeln!(out, "- re-link missing records: ark relink");
            }
            if self.unassigned_count() > 0 {
                let names: Vec<&str> = self
                    .variants
                    .values()
                    .flat_map(|a| a.unassigned.iter().map(String::as_str))
                    .collect();
                let _ = writeln!(out, "- remove unassigned files: ark prune {}", names.join(" "));
            }
            let _ = writeln!(out, "Back up records and storage before applying repairs.");
        }
        let _ = writeln!(out, "{rule_heavy}");
        out
    }

    fn variant_label(&self, catalog: &Catalog, id: VariantId) -> String {
        match catalog.variants.spec(id) {
            Ok(spec) => format!("{:?}", spec.name),
            Err(_) => format!("{id}"),
        }
    }
}

impl Default for ReconciliationReport {
    fn default() -> Self {
        Self::new()
    }
}
