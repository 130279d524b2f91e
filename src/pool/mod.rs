//! Worker pool module - Ordered parallel map over chunks of work
//!
//! Provides:
//! - The `WorkerPool` capability the registry fans reads out through
//! - `worker_map`, which chunks inputs per worker and flattens results in order
//! - Sequential and rayon-backed pools

pub mod sequential;
pub mod thread;

pub use sequential::Sequential;
pub use thread::ThreadPool;

/// A pool that runs a function over a list of inputs and returns the outputs
/// in input order.
pub trait WorkerPool: Send + Sync {
    /// Number of workers inputs are spread across
    fn number_of_threads(&self) -> usize;

    /// Apply `task` to every input, returning outputs in input order
    fn map<T, R, F>(&self, task: F, inputs: Vec<T>) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync;
}

/// Split `items` into exactly `num_chunks` contiguous chunks.
///
/// Chunk sizes differ by at most one and the leading chunks take the
/// remainder, so some chunks are empty when there are fewer items than chunks.
pub fn chunk_list<T>(items: Vec<T>, num_chunks: usize) -> Vec<Vec<T>> {
    let num_chunks = num_chunks.max(1);
    let base = items.len() / num_chunks;
    let remainder = items.len() % num_chunks;

    let mut iter = items.into_iter();
    (0..num_chunks)
        .map(|i| {
            let size = base + usize::from(i < remainder);
            iter.by_ref().take(size).collect()
        })
        .collect()
}

/// Run a chunk-level `task` across the pool and flatten the per-chunk outputs.
///
/// `task` is invoked once per chunk, possibly with an empty chunk. The first
/// failing chunk (in input order) aborts the whole map.
pub fn worker_map<P, T, R, E, F>(pool: &P, task: F, items: Vec<T>) -> Result<Vec<R>, E>
where
    P: WorkerPool + ?Sized,
    T: Send,
    R: Send,
    E: Send,
    F: Fn(Vec<T>) -> Result<Vec<R>, E> + Send + Sync,
{
    let chunks = chunk_list(items, pool.number_of_threads());
    let mut outputs = Vec::new();
    for chunk_result in pool.map(task, chunks) {
        outputs.extend(chunk_result?);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_list_even() {
        let chunks = chunk_list(vec![1, 2, 3, 4], 2);
        assert_eq!(chunks, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_chunk_list_remainder_goes_first() {
        let chunks = chunk_list(vec![1, 2, 3, 4, 5], 3);
        assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn test_chunk_list_more_chunks_than_items() {
        let chunks = chunk_list(vec![1, 2], 4);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], vec![1]);
        assert_eq!(chunks[1], vec![2]);
        assert!(chunks[2].is_empty());
        assert!(chunks[3].is_empty());
    }

    #[test]
    fn test_chunk_list_empty() {
        let chunks: Vec<Vec<u8>> = chunk_list(Vec::new(), 3);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_chunk_list_zero_chunks_treated_as_one() {
        let chunks = chunk_list(vec![1, 2, 3], 0);
        assert_eq!(chunks, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_worker_map_preserves_order() {
        let pool = ThreadPool::new(3).unwrap();
        let items: Vec<u32> = (0..10).collect();
        let result: Result<Vec<u32>, String> = worker_map(
            &pool,
            |chunk: Vec<u32>| Ok(chunk.into_iter().map(|x| x * 2).collect()),
            items,
        );
        assert_eq!(result.unwrap(), (0..10).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_worker_map_fails_fast() {
        let pool = Sequential;
        let result: Result<Vec<u32>, String> = worker_map(
            &pool,
            |chunk: Vec<u32>| {
                if chunk.contains(&3) {
                    Err("bad chunk".to_string())
                } else {
                    Ok(chunk)
                }
            },
            vec![1, 2, 3, 4],
        );
        assert_eq!(result.unwrap_err(), "bad chunk");
    }

    #[test]
    fn test_worker_map_calls_task_for_empty_chunks() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let pool = ThreadPool::new(4).unwrap();
        let calls = AtomicUsize::new(0);
        let result: Result<Vec<u32>, String> = worker_map(
            &pool,
            |chunk: Vec<u32>| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(chunk)
            },
            vec![7],
        );
        assert_eq!(result.unwrap(), vec![7]);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
