//! In-memory object store
//!
//! Objects live in one map keyed by full URI and shared by every store the
//! provider opens. Open and get calls are counted so callers can check how much
//! I/O an operation performed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::{BlobStore, StoreProvider};
use crate::core::error::{MetadataError, Result};
use crate::core::paths::{join_uri, S3Uri};

#[derive(Debug, Default)]
struct Shared {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    opens: AtomicUsize,
    gets: AtomicUsize,
}

/// Opens stores over a shared in-memory object map
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    shared: Arc<Shared>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object under a full URI
    pub fn insert(&self, uri: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.shared.objects.write().insert(uri.into(), data.into());
    }

    /// Content of the object at a full URI
    pub fn object(&self, uri: &str) -> Option<Vec<u8>> {
        self.shared.objects.read().get(uri).cloned()
    }

    /// Every stored URI, sorted
    pub fn uris(&self) -> Vec<String> {
        self.shared.objects.read().keys().cloned().collect()
    }

    /// Number of stores opened so far
    pub fn open_count(&self) -> usize {
        self.shared.opens.load(Ordering::SeqCst)
    }

    /// Number of object reads so far
    pub fn get_count(&self) -> usize {
        self.shared.gets.load(Ordering::SeqCst)
    }
}

impl StoreProvider for MemoryProvider {
    fn open(&self, root: &str) -> Result<Box<dyn BlobStore>> {
        let uri = S3Uri::parse(root)?;
        self.shared.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryStore {
            root: uri.to_string(),
            shared: Arc::clone(&self.shared),
        }))
    }
}

/// A store view over the shared map, scoped to one root
#[derive(Debug)]
pub struct MemoryStore {
    root: String,
    shared: Arc<Shared>,
}

impl BlobStore for MemoryStore {
    fn root(&self) -> &str {
        &self.root
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.shared.gets.fetch_add(1, Ordering::SeqCst);
        let uri = join_uri(&self.root, key);
        let objects = self.shared.objects.read();
        match objects.get(&uri) {
            Some(data) => Ok(data.clone()),
            None => Err(MetadataError::NotFound { key: uri }),
        }
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let uri = join_uri(&self.root, key);
        self.shared.objects.write().insert(uri, data.to_vec());
        Ok(())
    }

    fn list(&self, dir: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", join_uri(&self.root, dir).trim_end_matches('/'));
        let objects = self.shared.objects.read();
        Ok(objects
            .keys()
            .filter_map(|uri| uri.strip_prefix(&prefix))
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .map(str::to_string)
            .collect())
    }
}
