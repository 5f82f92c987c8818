//! Fixed-size worker pool for blocking extraction jobs
//!
//! Jobs run on dedicated OS threads so a slow download never stalls the
//! async request layer. Each submission returns a [`JobHandle`]; awaiting it
//! is the only blocking step. There is no job registry, no polling API and no
//! cancellation: a submitted job always runs to completion or failure.
//!
//! Jobs beyond the worker count wait in an unbounded FIFO queue.

use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::JoinHandle;
use tokio::sync::oneshot;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Pool of named worker threads created once and reused for the pool's lifetime
///
/// # Examples
///
/// ```
/// use audio_dl::pool::WorkerPool;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), audio_dl::Error> {
/// let pool = WorkerPool::new(4)?;
/// let handle = pool.submit(|| Ok(21 * 2))?;
/// assert_eq!(handle.wait().await?, 42);
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool {
    sender: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` worker threads named `extract-worker-<n>`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero size and [`Error::Io`] if a thread
    /// cannot be spawned.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::config(
                "DOWNLOAD_WORKERS",
                "worker pool needs at least one thread",
            ));
        }

        let (sender, receiver) = unbounded::<Task>();
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let receiver = receiver.clone();
            let handle = std::thread::Builder::new()
                .name(format!("extract-worker-{id}"))
                .spawn(move || worker_loop(id, receiver))?;
            workers.push(handle);
        }

        tracing::debug!(workers = size, "Worker pool started");

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue `job` and return a handle to its eventual result
    ///
    /// Never waits for the job itself. Safe to call from many tasks at once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pool`] when the pool has no live workers left.
    pub fn submit<F, T>(&self, job: F) -> Result<JobHandle<T>>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();

        let task: Task = Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|panic| {
                Err(Error::Pool(format!("job panicked: {}", panic_message(&*panic))))
            });
            // The waiter may have gone away; the job still ran to completion
            let _ = result_tx.send(outcome);
        });

        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| Error::Pool("worker pool is shut down".into()))?;

        sender
            .send(task)
            .map_err(|_| Error::Pool("no worker threads available".into()))?;

        Ok(JobHandle { receiver: result_rx })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue lets workers drain it and exit
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked outside a job");
            }
        }
        tracing::debug!("Worker pool stopped");
    }
}

fn worker_loop(id: usize, receiver: Receiver<Task>) {
    while let Ok(task) = receiver.recv() {
        tracing::trace!(worker = id, "Picked up job");
        task();
    }
    tracing::trace!(worker = id, "Job queue closed, worker exiting");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Handle to one submitted job
#[must_use = "a job's result is only observable through its handle"]
pub struct JobHandle<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> JobHandle<T> {
    /// Wait for the job without blocking the async runtime
    pub async fn wait(self) -> Result<T> {
        self.receiver
            .await
            .map_err(|_| Error::Pool("worker dropped the job without a result".into()))?
    }

    /// Wait for the job from synchronous code
    ///
    /// Panics if called from inside an async runtime context.
    pub fn blocking_wait(self) -> Result<T> {
        self.receiver
            .blocking_recv()
            .map_err(|_| Error::Pool("worker dropped the job without a result".into()))?
    }
}
