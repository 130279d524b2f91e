//! Store module - Object store access behind a small trait seam
//!
//! Provides:
//! - `BlobStore`: get/put/list of whole objects under one root URI
//! - `StoreProvider`: opens a store scoped to a root URI
//! - A filesystem-backed provider and an in-memory provider

pub mod local;
pub mod memory;

pub use local::LocalProvider;
pub use memory::MemoryProvider;

use crate::core::error::Result;

/// An object store client scoped to one root URI.
///
/// Keys are relative to the root and use '/' as separator.
pub trait BlobStore: Send {
    /// Canonical root URI this store was opened with
    fn root(&self) -> &str;

    /// Fetch the full content of an object
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Create or replace an object
    fn put(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Names of the objects directly under `dir`, sorted.
    ///
    /// A directory with no objects is empty, not an error.
    fn list(&self, dir: &str) -> Result<Vec<String>>;
}

/// Opens object store clients; shared by every worker of a retrieval
pub trait StoreProvider: Send + Sync {
    fn open(&self, root: &str) -> Result<Box<dyn BlobStore>>;
}
