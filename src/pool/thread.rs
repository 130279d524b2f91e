//! Rayon-backed worker pool

use rayon::prelude::*;

use super::WorkerPool;

/// A dedicated rayon thread pool with a fixed number of workers
pub struct ThreadPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl ThreadPool {
    /// Build a pool with `threads` workers (at least one)
    pub fn new(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let threads = threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cachemeta-worker-{}", i))
            .build()?;
        Ok(Self { pool, threads })
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.threads)
            .finish()
    }
}

impl WorkerPool for ThreadPool {
    fn number_of_threads(&self) -> usize {
        self.threads
    }

    fn map<T, R, F>(&self, task: F, inputs: Vec<T>) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        // Indexed collect keeps input order regardless of completion order
        self.pool
            .install(|| inputs.into_par_iter().map(task).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_pool_map_keeps_order() {
        let pool = ThreadPool::new(4).unwrap();
        let inputs: Vec<u64> = (0..100).collect();
        let out = pool.map(|x| x * x, inputs);
        assert_eq!(out, (0..100u64).map(|x| x * x).collect::<Vec<_>>());
    }

    #[test]
    fn test_thread_pool_zero_threads_clamped() {
        let pool = ThreadPool::new(0).unwrap();
        assert_eq!(pool.number_of_threads(), 1);
    }
}
