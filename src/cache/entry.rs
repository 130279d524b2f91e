//! Metadata entities recorded for each caching pass

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata for one cached model input feature file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataEntry {
    location: PathBuf,
}

impl MetadataEntry {
    /// Table columns, in order. Must match the serde field list above.
    pub const COLUMNS: &'static [&'static str] = &["location"];

    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Where the cached artifact is stored
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Summary of one caching pass.
///
/// `cache_metadata` holds one slot per attempted item, `None` where caching
/// failed, so its length is always `successes + failures`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOutcome {
    pub successes: usize,
    pub failures: usize,
    pub cache_metadata: Vec<Option<MetadataEntry>>,
}

impl CacheOutcome {
    /// Build an outcome whose counts are derived from the slots
    pub fn from_entries(cache_metadata: Vec<Option<MetadataEntry>>) -> Self {
        let successes = cache_metadata.iter().filter(|e| e.is_some()).count();
        Self {
            successes,
            failures: cache_metadata.len() - successes,
            cache_metadata,
        }
    }

    /// Combine the outcomes of several workers, keeping slot order
    pub fn merge(outcomes: impl IntoIterator<Item = CacheOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(CacheOutcome::default(), |mut acc, outcome| {
                acc.successes += outcome.successes;
                acc.failures += outcome.failures;
                acc.cache_metadata.extend(outcome.cache_metadata);
                acc
            })
    }

    /// Entries of the successful slots, in order
    pub fn successful_entries(&self) -> Vec<MetadataEntry> {
        self.cache_metadata.iter().flatten().cloned().collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.cache_metadata.len() == self.successes + self.failures
    }
}

/// One shard file to fetch, paired with the sanitized cache root it lives under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardRequest {
    metadata_filename: String,
    cache_root: String,
}

impl ShardRequest {
    pub fn new(metadata_filename: impl Into<String>, cache_root: impl Into<String>) -> Self {
        Self {
            metadata_filename: metadata_filename.into(),
            cache_root: cache_root.into(),
        }
    }

    pub fn metadata_filename(&self) -> &str {
        &self.metadata_filename
    }

    pub fn cache_root(&self) -> &str {
        &self.cache_root
    }
}
