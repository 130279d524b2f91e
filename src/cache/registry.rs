//! Cache metadata registry - Record and read back per-node metadata shards
//!
//! Layout under a cache root:
//! `<root>/metadata/<cache_name>_metadata_node_<node_id>.<ext>`

use std::path::Path;

use tracing::{debug, info};

use crate::cache::entry::{MetadataEntry, ShardRequest};
use crate::cache::table::TableFormat;
use crate::core::error::Result;
use crate::core::paths::{cache_name, join_uri, sanitise_s3_path};
use crate::pool::{worker_map, WorkerPool};
use crate::store::StoreProvider;

/// Directory under the cache root holding metadata shards
pub const METADATA_DIR: &str = "metadata";

/// File name of one node's shard
pub fn shard_file_name(cache_name: &str, node_id: u32, format: TableFormat) -> String {
    format!(
        "{}_metadata_node_{}.{}",
        cache_name,
        node_id,
        format.extension()
    )
}

/// Node id encoded in a shard file name, if it is one of this cache's shards
pub fn shard_node_id(file_name: &str, cache_name: &str, format: TableFormat) -> Option<u32> {
    file_name
        .strip_prefix(cache_name)?
        .strip_prefix("_metadata_node_")?
        .strip_suffix(format.extension())?
        .strip_suffix('.')?
        .parse()
        .ok()
}

/// Full URI of the shard `save_cache_metadata` writes for a node
pub fn shard_uri(cache_path: &Path, node_id: u32, format: TableFormat) -> String {
    let file_name = shard_file_name(&cache_name(cache_path), node_id, format);
    join_uri(&sanitise_s3_path(cache_path), &metadata_key(&file_name))
}

fn metadata_key(file_name: &str) -> String {
    format!("{}/{}", METADATA_DIR, file_name)
}

/// Key of a shard relative to the cache root.
///
/// Bare file names live under the metadata directory; anything containing a
/// '/' is taken as root-relative, and a full URI under the root is made
/// relative to it.
fn shard_key(cache_root: &str, metadata_filename: &str) -> String {
    if let Some(relative) = metadata_filename
        .strip_prefix(cache_root)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        return relative.to_string();
    }
    if metadata_filename.contains('/') {
        metadata_filename.trim_start_matches('/').to_string()
    } else {
        metadata_key(metadata_filename)
    }
}

/// Persist the entries of one caching pass as this node's metadata shard.
///
/// Performs exactly one write; any store error propagates unchanged.
pub fn save_cache_metadata(
    entries: &[MetadataEntry],
    cache_path: &Path,
    node_id: u32,
    provider: &dyn StoreProvider,
    format: TableFormat,
) -> Result<()> {
    let root = sanitise_s3_path(cache_path);
    let key = metadata_key(&shard_file_name(&cache_name(cache_path), node_id, format));
    info!(
        path = %join_uri(&root, &key),
        entries = entries.len(),
        "Using cache metadata storage path"
    );

    let data = format.encode(entries)?;
    provider.open(&root)?.put(&key, &data)
}

/// Fetch and decode every shard in `requests` through one store client.
///
/// An empty chunk returns immediately without opening a store.
fn read_metadata_shards(
    provider: &dyn StoreProvider,
    format: TableFormat,
    requests: Vec<ShardRequest>,
) -> Result<Vec<MetadataEntry>> {
    let mut outputs = Vec::new();
    let Some(first) = requests.first() else {
        return Ok(outputs);
    };

    let store = provider.open(first.cache_root())?;
    for request in &requests {
        let key = shard_key(store.root(), request.metadata_filename());
        let data = store.get(&key)?;
        let entries = format.decode(request.metadata_filename(), &data)?;
        debug!(
            shard = request.metadata_filename(),
            rows = entries.len(),
            "read metadata shard"
        );
        outputs.extend(entries);
    }

    Ok(outputs)
}

/// Read the named shards under `cache_path` and concatenate their entries.
///
/// Results follow the order of `metadata_filenames`. Reads are spread across
/// `worker`; a failure on any shard aborts the whole read.
pub fn read_cache_metadata<P, S>(
    cache_path: &Path,
    metadata_filenames: &[S],
    worker: &P,
    provider: &dyn StoreProvider,
    format: TableFormat,
) -> Result<Vec<MetadataEntry>>
where
    P: WorkerPool + ?Sized,
    S: AsRef<str>,
{
    let root = sanitise_s3_path(cache_path);
    let requests: Vec<ShardRequest> = metadata_filenames
        .iter()
        .map(|name| ShardRequest::new(name.as_ref(), root.as_str()))
        .collect();

    debug!(
        root = %root,
        shards = requests.len(),
        workers = worker.number_of_threads(),
        "reading cache metadata"
    );

    worker_map(
        worker,
        |chunk| read_metadata_shards(provider, format, chunk),
        requests,
    )
}

/// Shard file names present under `cache_path`, ordered by node id
pub fn list_metadata_shards(
    cache_path: &Path,
    provider: &dyn StoreProvider,
    format: TableFormat,
) -> Result<Vec<String>> {
    let root = sanitise_s3_path(cache_path);
    let name = cache_name(cache_path);
    let store = provider.open(&root)?;

    let mut shards: Vec<(u32, String)> = store
        .list(METADATA_DIR)?
        .into_iter()
        .filter_map(|file| shard_node_id(&file, &name, format).map(|id| (id, file)))
        .collect();
    shards.sort();

    debug!(root = %root, shards = shards.len(), "listed metadata shards");
    Ok(shards.into_iter().map(|(_, file)| file).collect())
}
