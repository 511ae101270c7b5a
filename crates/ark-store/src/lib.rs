//! File-storage collaborator contract for ARK.
//!
//! The reconciliation engine never touches the filesystem directly; it goes
//! through the [`FileStore`] trait. Two implementations ship here:
//! [`LocalFileStore`] against a real directory tree, and
//! [`InMemoryFileStore`] for tests and embedding.
//!
//! The contract's one sharp edge: an unavailable location (missing, not a
//! directory, unreadable) is a hard [`StoreError::LocationUnavailable`],
//! never an empty listing. Conflating the two would corrupt any audit built
//! on top.

pub mod error;
pub mod local;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use local::LocalFileStore;
pub use memory::InMemoryFileStore;
pub use traits::FileStore;
