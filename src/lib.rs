//! cachemeta - Metadata registry for cached training feature files
//!
//! cachemeta provides:
//! - Per-node metadata shards recording which feature files were cached
//! - Parallel read-back of every node's shard through a worker pool
//! - Object store and worker pool seams with local implementations

pub mod cache;
pub mod core;
pub mod pool;
pub mod store;

pub use crate::cache::entry::{CacheOutcome, MetadataEntry, ShardRequest};
pub use crate::cache::fields::{extract_field_from_cache_metadata_entries, locations};
pub use crate::cache::registry::{
    list_metadata_shards, read_cache_metadata, save_cache_metadata, shard_file_name, shard_uri,
};
pub use crate::cache::table::TableFormat;
pub use crate::core::error::{MetadataError, Result};
pub use crate::core::paths::sanitise_s3_path;
