//! Bounded worker pool for listing processing
//!
//! Every job waits for a permit from a shared semaphore before it starts, so
//! at most `workers` jobs are in flight. The jobs are joined on the calling
//! task and interleave whenever one awaits I/O, which lets them hold values
//! that are not `Send` (parsed documents).

use futures::future::join_all;
use std::future::Future;
use tokio::sync::Semaphore;

/// Runs jobs with at most `workers` in flight
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool; a limit of zero is treated as one
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Returns the concurrency limit
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Processes every job and returns the results in job order
    ///
    /// A job's future is only created once it holds a permit, and the permit
    /// is released as soon as that future completes.
    pub async fn run<J, R, F, Fut>(&self, jobs: Vec<J>, handler: F) -> Vec<R>
    where
        F: Fn(J) -> Fut,
        Fut: Future<Output = R>,
    {
        let semaphore = Semaphore::new(self.workers);
        let (semaphore, handler) = (&semaphore, &handler);

        let tasks = jobs.into_iter().map(move |job| async move {
            // The semaphore is owned by this call and never closed
            let _permit = semaphore.acquire().await;
            handler(job).await
        });

        join_all(tasks).await
    }
}
