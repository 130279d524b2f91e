//! Registry configuration
//!
//! Resolved by the CLI from flags and `CACHEMETA_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cache::table::TableFormat;
use crate::pool::ThreadPool;
use crate::store::LocalProvider;

/// Settings shared by every registry command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base directory of the local object store (`s3://bucket/..` maps to `<store_dir>/bucket/..`)
    pub store_dir: PathBuf,

    /// Number of workers used to read shards
    pub workers: usize,

    /// Format shards are written and read in
    pub table_format: TableFormat,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("."),
            workers: default_workers(),
            table_format: TableFormat::default(),
        }
    }
}

impl RegistryConfig {
    /// Store provider rooted at `store_dir`
    pub fn provider(&self) -> LocalProvider {
        LocalProvider::new(&self.store_dir)
    }

    /// Worker pool sized to `workers`
    pub fn build_pool(&self) -> Result<ThreadPool, rayon::ThreadPoolBuildError> {
        ThreadPool::new(self.workers)
    }
}

/// Available parallelism, or one worker when it cannot be determined
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
