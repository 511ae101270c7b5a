use std::collections::BTreeSet;

use crate::error::StoreResult;

/// Flat file storage, one level of named locations holding named files.
///
/// All implementations must satisfy these invariants:
/// - `list` returns plain files only, never subdirectories.
/// - An unavailable location is an error, never an empty set.
/// - `delete` is idempotent: deleting an absent file reports `false`, it
///   does not fail.
/// - Listings are returned in sorted order (`BTreeSet`) so consumers can
///   render deterministic output.
pub trait FileStore: Send + Sync {
    /// List the file names present in a location.
    fn list(&self, location: &str) -> StoreResult<BTreeSet<String>>;

    /// Check whether a file exists in a location.
    fn exists(&self, location: &str, name: &str) -> StoreResult<bool>;

    /// Delete a file. Returns `true` if the file existed.
    fn delete(&self, location: &str, name: &str) -> StoreResult<bool>;

    /// Copy a file within or across locations.
    fn copy(
        &self,
        location: &str,
        name: &str,
        dest_location: &str,
        dest_name: &str,
    ) -> StoreResult<()>;
}
