//! Operator-invoked repairs: re-link missing records, prune unassigned
//! files. Both are idempotent, dry-run-capable, and isolate per-item
//! failures into the outcome instead of aborting the batch.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::{debug, info};

use ark_store::FileStore;
use ark_types::{CreatedAt, OwnerId, VariantId};

use crate::error::ReconcileResult;
use crate::records::RecordStore;

/// Result of trying to re-link one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum LinkOutcome {
    /// The record now owns this file name.
    Linked { owner: u64, name: String },
    /// No unassigned file matched; the caller falls back to issuing a
    /// fresh default object through an external collaborator.
    NoCandidate { owner: u64 },
}

/// Pick the unassigned file to re-link for an owner.
///
/// Candidates that fail to decode are excluded, not fatal; of those whose
/// decoded owner matches, the newest creation time wins. Ties keep the
/// lexicographically first name, so the choice is stable run to run.
pub fn select_replacement(
    owner: OwnerId,
    candidates: &BTreeSet<String>,
) -> Option<(String, CreatedAt)> {
    let mut best: Option<(String, CreatedAt)> = None;
    for name in candidates {
        let id = match ark_codec::decode(name) {
            Ok(id) => id,
            Err(e) => {
                debug!(%name, error = %e, "excluding undecodable candidate");
                continue;
            }
        };
        if id.owner != owner {
            continue;
        }
        let newer = match &best {
            Some((_, current)) => id.created_at > *current,
            None => true,
        };
        if newer {
            best = Some((name.clone(), id.created_at));
        }
    }
    best
}

/// Re-link a record to the most plausible unassigned file.
///
/// Writes the chosen name back through the record store; the file itself
/// is left in place (deleting storage is a separate, explicit action).
pub fn link_missing_record(
    records: &dyn RecordStore,
    owner: OwnerId,
    variant: VariantId,
    candidates: &BTreeSet<String>,
) -> ReconcileResult<LinkOutcome> {
    match select_replacement(owner, candidates) {
        Some((name, created_at)) => {
            records.assign(owner, variant, &name)?;
            info!(owner = owner.get(), %variant, %name, %created_at, "re-linked record");
            Ok(LinkOutcome::Linked {
                owner: owner.get(),
                name,
            })
        }
        None => Ok(LinkOutcome::NoCandidate {
            owner: owner.get(),
        }),
    }
}

/// Outcome of one removal batch; successes and failures side by side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemovalOutcome {
    /// Files deleted (or, under dry-run, that would be deleted).
    pub removed: Vec<String>,
    /// Files already absent — reported, never an error.
    pub not_found: Vec<String>,
    /// Files whose deletion failed, with the reason.
    pub failed: Vec<(String, String)>,
    /// Whether this batch was a preview.
    pub dry_run: bool,
}

impl RemovalOutcome {
    /// Returns `true` if every requested file was removed or already gone.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Operator-facing text summary, deterministic for identical inputs.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let label = if self.dry_run { " (dry run)" } else { "" };
        let _ = writeln!(
            out,
            "Removal{label}: {} removed, {} not found, {} failed",
            self.removed.len(),
            self.not_found.len(),
            self.failed.len()
        );
        for name in &self.removed {
            let _ = writeln!(out, "- removed {name}");
        }
        for name in &self.not_found {
            let _ = writeln!(out, "- not found {name}");
        }
        for (name, reason) in &self.failed {
            let _ = writeln!(out, "- failed {name}: {reason}");
        }
        out
    }
}

/// Delete a batch of unassigned files from one location.
///
/// Each file succeeds or fails on its own; an already-absent file counts
/// as `not_found`, so re-running the same batch is safe. With `dry_run`
/// the same outcome shape is computed without touching storage.
pub fn remove_unassigned(
    files: &dyn FileStore,
    location: &str,
    names: &[String],
    dry_run: bool,
) -> RemovalOutcome {
    let mut outcome = RemovalOutcome {
        dry_run,
        ..RemovalOutcome::default()
    };

    for name in names {
        if dry_run {
            match files.exists(location, name) {
                Ok(true) => outcome.removed.push(name.clone()),
                Ok(false) => outcome.not_found.push(name.clone()),
                Err(e) => outcome.failed.push((name.clone(), e.to_string())),
            }
            continue;
        }
        match files.delete(location, name) {
            Ok(true) => {
                info!(location, %name, "removed unassigned file");
                outcome.removed.push(name.clone());
            }
            Ok(false) => outcome.not_found.push(name.clone()),
            Err(e) => outcome.failed.push((name.clone(), e.to_string())),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_store::InMemoryFileStore;
    use ark_types::AssetId;

    use crate::records::{AssetRecord, InMemoryRecordStore};

    fn vid(value: u8) -> VariantId {
        VariantId::new(value).unwrap()
    }

    fn owner(value: u64) -> OwnerId {
        OwnerId::new(value).unwrap()
    }

    fn token(app: u8, variant: u8, created_at: u64, owner: u64) -> String {
        ark_codec::encode(&AssetId::from_parts(app, variant, created_at, owner).unwrap())
            .unwrap()
            .into_string()
    }

    #[test]
    fn selects_the_newest_candidate_for_the_owner() {
        let older = token(1, 0, 1_600_000_000, 42);
        let newer = token(1, 0, 1_700_000_000, 42);
        let other_owner = token(1, 0, 1_800_000_000, 99);
        let candidates: BTreeSet<String> =
            [older, newer.clone(), other_owner].into_iter().collect();

        let (name, created_at) = select_replacement(owner(42), &candidates).unwrap();
        assert_eq!(name, newer);
        assert_eq!(created_at.as_secs(), 1_700_000_000);
    }

    #[test]
    fn undecodable_candidates_are_excluded_not_fatal() {
        let good = token(1, 0, 1_650_000_000, 42);
        let candidates: BTreeSet<String> = ["!!garbage!!".to_string(), good.clone()]
            .into_iter()
            .collect();

        let (name, _) = select_replacement(owner(42), &candidates).unwrap();
        assert_eq!(name, good);
    }

    #[test]
    fn owner_mismatch_just_disqualifies() {
        let candidates: BTreeSet<String> =
            [token(1, 0, 1_650_000_000, 7)].into_iter().collect();
        assert!(select_replacement(owner(42), &candidates).is_none());
    }

    #[test]
    fn link_writes_back_and_reports_the_choice() {
        let records = InMemoryRecordStore::new(vec![AssetRecord::new(42).with_absent(vid(0))]);
        let chosen = token(1, 0, 1_700_000_000, 42);
        let candidates: BTreeSet<String> =
            [token(1, 0, 1_600_000_000, 42), chosen.clone()]
                .into_iter()
                .collect();

        let outcome =
            link_missing_record(&records, owner(42), vid(0), &candidates).unwrap();
        assert_eq!(
            outcome,
            LinkOutcome::Linked {
                owner: 42,
                name: chosen.clone()
            }
        );
        let row = records.row(42).unwrap();
        assert_eq!(row.field(vid(0)).as_assigned(), Some(chosen.as_str()));
    }

    #[test]
    fn no_candidate_is_a_value_not_an_error() {
        let records = InMemoryRecordStore::new(vec![AssetRecord::new(42)]);
        let outcome =
            link_missing_record(&records, owner(42), vid(0), &BTreeSet::new()).unwrap();
        assert_eq!(outcome, LinkOutcome::NoCandidate { owner: 42 });
        // The record was not touched.
        assert!(records.row(42).unwrap().field(vid(0)).is_absent());
    }

    #[test]
    fn removal_is_idempotent() {
        let files = InMemoryFileStore::new();
        files.insert_file("master", "tokB");
        let names = vec!["tokB".to_string()];

        let first = remove_unassigned(&files, "master", &names, false);
        assert_eq!(first.removed, vec!["tokB".to_string()]);
        assert!(first.not_found.is_empty());
        assert!(first.is_complete());

        let second = remove_unassigned(&files, "master", &names, false);
        assert!(second.removed.is_empty());
        assert_eq!(second.not_found, vec!["tokB".to_string()]);
        assert!(second.is_complete());
    }

    #[test]
    fn mixed_batch_reports_each_file_independently() {
        let files = InMemoryFileStore::new();
        files.insert_file("master", "tokA");
        let names = vec!["tokA".to_string(), "tokGone".to_string()];

        let outcome = remove_unassigned(&files, "master", &names, false);
        assert_eq!(outcome.removed, vec!["tokA".to_string()]);
        assert_eq!(outcome.not_found, vec!["tokGone".to_string()]);
    }

    #[test]
    fn dry_run_previews_without_deleting() {
        let files = InMemoryFileStore::new();
        files.insert_file("master", "tokA");
        let names = vec!["tokA".to_string(), "tokGone".to_string()];

        let outcome = remove_unassigned(&files, "master", &names, true);
        assert!(outcome.dry_run);
        assert_eq!(outcome.removed, vec!["tokA".to_string()]);
        assert_eq!(outcome.not_found, vec!["tokGone".to_string()]);
        // Nothing was actually removed.
        assert!(files.exists("master", "tokA").unwrap());
    }

    #[test]
    fn render_lists_successes_and_failures_side_by_side() {
        let outcome = RemovalOutcome {
            removed: vec!["a".to_string()],
            not_found: vec!["b".to_string()],
            failed: vec![("c".to_string(), "io error".to_string())],
            dry_run: false,
        };
        let text = outcome.render();
        assert!(text.contains("1 removed, 1 not found, 1 failed"));
        assert!(text.contains("- removed a"));
        assert!(text.contains("- not found b"));
        assert!(text.contains("- failed c: io error"));
        assert!(!outcome.is_complete());
    }
}
