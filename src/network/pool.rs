//! Worker Pool
//!
//! Fixed set of worker threads fed by a crossbeam submission queue.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::{CalcError, Result};

/// Unit of work run on a worker thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size thread pool
///
/// ## Lifecycle
/// - `new`: spawns `size` workers blocked on the queue
/// - `execute`: enqueues a job; safe from any number of threads
/// - `shutdown`: closes the queue, lets queued and running jobs finish,
///   then joins every worker
///
/// A panicking job is caught and logged; its worker keeps serving.
pub struct WorkerPool {
    /// Submission side of the queue (`None` once shut down)
    sender: Mutex<Option<Sender<Job>>>,

    /// Worker threads, drained on shutdown
    workers: Mutex<Vec<JoinHandle<()>>>,

    size: usize,
}

impl WorkerPool {
    /// Spawn `size` workers
    ///
    /// With `queue_capacity = Some(n)` at most `n` jobs wait in the queue and
    /// `execute` blocks while it is full. `None` never blocks.
    pub fn new(size: usize, queue_capacity: Option<usize>) -> Result<Self> {
        if size == 0 {
            return Err(CalcError::Pool("pool size must be at least 1".to_string()));
        }

        let (sender, receiver) = match queue_capacity {
            Some(capacity) => channel::bounded::<Job>(capacity),
            None => channel::unbounded::<Job>(),
        };

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("calcnet-worker-{}", id))
                .spawn(move || worker_loop(id, receiver))?;
            workers.push(handle);
        }

        tracing::debug!(
            "Worker pool started: {} workers, queue capacity {:?}",
            size,
            queue_capacity
        );

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            size,
        })
    }

    /// Submit a job
    ///
    /// Fails with [`CalcError::Pool`] after shutdown.
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        // Clone the sender so a full bounded queue does not hold the lock
        let sender = self
            .sender
            .lock()
            .as_ref()
            .cloned()
            .ok_or_else(|| CalcError::Pool("worker pool is shut down".to_string()))?;

        sender
            .send(Box::new(job))
            .map_err(|_| CalcError::Pool("worker pool queue is closed".to_string()))
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs waiting for a free worker
    pub fn queued(&self) -> usize {
        self.sender.lock().as_ref().map_or(0, |s| s.len())
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Stop accepting jobs and wait for queued and running jobs to finish
    ///
    /// Idempotent.
    pub fn shutdown(&self) {
        let sender = self.sender.lock().take();
        if sender.is_none() {
            return;
        }
        // Workers exit once the queue is empty and every sender is gone
        drop(sender);

        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        let count = workers.len();
        for handle in workers {
            if handle.join().is_err() {
                tracing::error!("Worker thread terminated abnormally");
            }
        }

        tracing::debug!("Worker pool stopped: {} workers joined", count);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(id: usize, receiver: Receiver<Job>) {
    for job in receiver.iter() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!("Job panicked on worker {}", id);
        }
    }
    tracing::trace!("Worker {} exiting", id);
}
