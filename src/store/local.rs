//! Filesystem-backed object store
//!
//! `s3://<bucket>/<prefix>` maps to `<base_dir>/<bucket>/<prefix>`, which makes
//! a local directory (or a mounted bucket) usable wherever a store is expected.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{BlobStore, StoreProvider};
use crate::core::error::{MetadataError, Result};
use crate::core::paths::{join_uri, S3Uri};

/// Opens [`LocalStore`]s under a base directory
#[derive(Debug, Clone)]
pub struct LocalProvider {
    base_dir: PathBuf,
}

impl LocalProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl StoreProvider for LocalProvider {
    fn open(&self, root: &str) -> Result<Box<dyn BlobStore>> {
        let uri = S3Uri::parse(root)?;
        let mut dir = self.base_dir.join(&uri.bucket);
        if !uri.prefix.is_empty() {
            dir = dir.join(&uri.prefix);
        }
        debug!(root, dir = %dir.display(), "opened local store");
        Ok(Box::new(LocalStore {
            root: uri.to_string(),
            dir,
        }))
    }
}

/// A store rooted at one directory
#[derive(Debug)]
pub struct LocalStore {
    root: String,
    dir: PathBuf,
}

impl LocalStore {
    fn object_path(&self, key: &str) -> PathBuf {
        self.dir.join(key.trim_start_matches('/'))
    }
}

impl BlobStore for LocalStore {
    fn root(&self) -> &str {
        &self.root
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        fs::read(self.object_path(key))
            .map_err(|e| MetadataError::store(join_uri(&self.root, key), e))
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| MetadataError::store(join_uri(&self.root, key), e))?;
        }
        fs::write(&path, data).map_err(|e| MetadataError::store(join_uri(&self.root, key), e))
    }

    fn list(&self, dir: &str) -> Result<Vec<String>> {
        let path = self.object_path(dir);
        if !path.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&path).map_err(|e| MetadataError::store(join_uri(&self.root, dir), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MetadataError::store(join_uri(&self.root, dir), e))?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
