use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use cachemeta::pool::{Sequential, ThreadPool, WorkerPool};
use cachemeta::store::{LocalProvider, MemoryProvider, StoreProvider};
use cachemeta::{
    extract_field_from_cache_metadata_entries, list_metadata_shards, read_cache_metadata,
    save_cache_metadata, shard_file_name, CacheOutcome, MetadataEntry, MetadataError,
    TableFormat,
};
use tempfile::tempdir;

/// Sequential pool that records how many chunks it was handed
#[derive(Default)]
struct CountingPool {
    threads: usize,
    chunks: AtomicUsize,
}

impl WorkerPool for CountingPool {
    fn number_of_threads(&self) -> usize {
        self.threads
    }

    fn map<T, R, F>(&self, task: F, inputs: Vec<T>) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        self.chunks.fetch_add(inputs.len(), Ordering::SeqCst);
        inputs.into_iter().map(task).collect()
    }
}

fn features(log: &str, n: usize) -> Vec<MetadataEntry> {
    (0..n)
        .map(|i| MetadataEntry::new(format!("/data/cache/{}/scenario_{}/raster.gz", log, i)))
        .collect()
}

#[test]
fn caching_pass_outcome_feeds_save_and_read() {
    let provider = MemoryProvider::new();
    let cache = Path::new("s3://bucket/cache");

    let worker_outcomes = vec![
        CacheOutcome::from_entries(vec![Some(MetadataEntry::new("a.gz")), None]),
        CacheOutcome::from_entries(vec![Some(MetadataEntry::new("b.gz"))]),
    ];
    let outcome = CacheOutcome::merge(worker_outcomes);
    assert_eq!((outcome.successes, outcome.failures), (2, 1));

    save_cache_metadata(
        &outcome.successful_entries(),
        cache,
        0,
        &provider,
        TableFormat::Csv,
    )
    .unwrap();

    let shards = list_metadata_shards(cache, &provider, TableFormat::Csv).unwrap();
    let read = read_cache_metadata(cache, &shards, &Sequential, &provider, TableFormat::Csv)
        .unwrap();
    assert_eq!(read, outcome.successful_entries());

    let values = extract_field_from_cache_metadata_entries(&read, "location").unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[1], "b.gz");
}

#[test]
fn multi_node_read_through_custom_pool() {
    let provider = MemoryProvider::new();
    let cache = Path::new("bucket/cache");
    let shard_a = features("log_a", 2);
    let shard_b = features("log_b", 3);
    save_cache_metadata(&shard_a, cache, 0, &provider, TableFormat::Jsonl).unwrap();
    save_cache_metadata(&shard_b, cache, 1, &provider, TableFormat::Jsonl).unwrap();

    let pool = CountingPool {
        threads: 5,
        ..Default::default()
    };
    let names = [
        shard_file_name("cache", 0, TableFormat::Jsonl),
        shard_file_name("cache", 1, TableFormat::Jsonl),
    ];
    let read = read_cache_metadata(cache, &names, &pool, &provider, TableFormat::Jsonl).unwrap();

    assert_eq!(read.len(), 5);
    assert_eq!(read[..2], shard_a[..]);
    assert_eq!(read[2..], shard_b[..]);
    // one chunk per worker, three of them empty
    assert_eq!(pool.chunks.load(Ordering::SeqCst), 5);
    assert_eq!(provider.get_count(), 2);
}

#[test]
fn shards_written_to_disk_are_read_in_parallel() {
    let temp = tempdir().unwrap();
    let provider = LocalProvider::new(temp.path());
    let cache = Path::new("s3://training/features/exp_42");

    let mut expected = Vec::new();
    for node in 0..8 {
        let entries = features(&format!("node_{}", node), node as usize + 1);
        save_cache_metadata(&entries, cache, node, &provider, TableFormat::Csv).unwrap();
        expected.extend(entries);
    }

    let shards = list_metadata_shards(cache, &provider, TableFormat::Csv).unwrap();
    assert_eq!(shards.len(), 8);

    let pool = ThreadPool::new(3).unwrap();
    let read = read_cache_metadata(cache, &shards, &pool, &provider, TableFormat::Csv).unwrap();
    assert_eq!(read, expected);
}

#[test]
fn save_surfaces_store_errors() {
    struct FailingProvider;

    impl StoreProvider for FailingProvider {
        fn open(&self, root: &str) -> cachemeta::Result<Box<dyn cachemeta::store::BlobStore>> {
            Err(MetadataError::Store {
                key: root.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    let result = save_cache_metadata(
        &features("log", 1),
        Path::new("s3://bucket/cache"),
        0,
        &FailingProvider,
        TableFormat::Csv,
    );
    assert!(matches!(result, Err(MetadataError::Store { .. })));
}
