//! Single-worker pool running on the calling thread

use super::WorkerPool;

/// Runs every input in order on the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl WorkerPool for Sequential {
    fn number_of_threads(&self) -> usize {
        1
    }

    fn map<T, R, F>(&self, task: F, inputs: Vec<T>) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        inputs.into_iter().map(task).collect()
    }
}
