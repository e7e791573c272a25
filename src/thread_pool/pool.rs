use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, error, trace};

use super::task::{panic_message, run_to_outcome, Message, Task, TaskHandle};
use crate::queue::BlockingQueue;
use crate::{PoolError, Result};

struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, queue: Arc<BlockingQueue<Message>>) -> Result<Worker> {
        let handle = thread::Builder::new()
            .name(format!("workpool-worker-{}", id))
            .spawn(move || {
                loop {
                    match queue.pop() {
                        Some(Message::Run(task)) => {
                            // a panicking task must not take the worker down
                            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| task())) {
                                error!("Worker {}: task panicked: {}", id, panic_message(&*payload));
                            }
                        }
                        Some(Message::Terminate) | None => break,
                    }
                }
                trace!("Worker {} exiting", id);
            })?;

        Ok(Worker {
            id,
            handle: Some(handle),
        })
    }
}

/// A fixed-size pool of worker threads pulling tasks from a shared
/// [`BlockingQueue`].
///
/// Workers are spawned at construction time and the pool size never changes
/// afterwards. Tasks are dequeued in submission order, but completion order
/// across workers is unordered.
///
/// # Note:
/// Dropping a `WorkerPool` blocks until every task accepted before the drop
/// has run to completion, so care must be given to not submit a task that
/// runs an infinite loop.
///
/// # Example:
///
/// ```
/// use workpool::WorkerPool;
/// use std::sync::{Arc, Mutex};
///
/// let pool = WorkerPool::new(4).unwrap();
/// let counter = Arc::new(Mutex::new(0));
///
/// // increment the counter from 8 tasks
/// for _ in 0..8 {
///     let counter = Arc::clone(&counter);
///     pool.spawn(move || {
///         *counter.lock().unwrap() += 1;
///     })
///     .unwrap();
/// }
///
/// // dropping the pool joins the workers after the queue drains
/// drop(pool);
/// assert_eq!(8, *counter.lock().unwrap());
/// ```
pub struct WorkerPool {
    workers: Vec<Worker>,
    queue: Arc<BlockingQueue<Message>>,
    // gates submission against teardown so no task lands behind the
    // terminate sentinels
    stopped: Mutex<bool>,
}

impl WorkerPool {
    /// Creates a new pool, immediately spawning `workers` worker threads.
    ///
    /// Returns [`PoolError::NoWorkers`] when `workers` is zero and an IO
    /// error if any thread fails to spawn; in the latter case all
    /// previously-spawned workers are terminated before returning.
    pub fn new(workers: u32) -> Result<WorkerPool> {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }

        let queue = Arc::new(BlockingQueue::new());
        let mut spawned: Vec<Worker> = Vec::with_capacity(workers as usize);
        for id in 0..workers as usize {
            match Worker::new(id, Arc::clone(&queue)) {
                Ok(worker) => spawned.push(worker),
                Err(err) => {
                    queue.shutdown();
                    for worker in &mut spawned {
                        if let Some(handle) = worker.handle.take() {
                            let _ = handle.join();
                        }
                    }
                    return Err(err);
                }
            }
        }

        Ok(WorkerPool {
            workers: spawned,
            queue,
            stopped: Mutex::new(false),
        })
    }

    /// Creates a pool with one worker per logical CPU of the host.
    pub fn with_num_cpus() -> Result<WorkerPool> {
        Self::new(num_cpus::get() as u32)
    }

    /// Submits a task and returns the handle to its eventual outcome.
    ///
    /// Never blocks. The handle resolves to the task's return value, or to
    /// [`PoolError::Panicked`] if the task body panics; a failing task
    /// cannot affect other tasks or the pool itself. Fails with
    /// [`PoolError::Stopped`] once teardown has begun.
    pub fn submit<F, T>(&self, job: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, handle) = TaskHandle::channel();
        let task: Task = Box::new(move || {
            // the receiver may already be gone; nobody is waiting then
            let _ = sender.send(run_to_outcome(job));
        });
        self.enqueue(task)?;
        Ok(handle)
    }

    /// Submits a task without a result handle.
    ///
    /// A panic in `job` is caught by the executing worker and logged; the
    /// worker keeps running. Fails with [`PoolError::Stopped`] once
    /// teardown has begun.
    pub fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(job))
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    fn enqueue(&self, task: Task) -> Result<()> {
        let stopped = self.stopped.lock().unwrap();
        if *stopped {
            return Err(PoolError::Stopped);
        }
        self.queue.push(Message::Run(task));
        Ok(())
    }

    /// Stops the pool: rejects new submissions, lets workers drain every
    /// task accepted so far, then joins them.
    ///
    /// Idempotent. Called automatically on drop.
    pub fn shutdown(&mut self) {
        {
            let mut stopped = self.stopped.lock().unwrap();
            if !*stopped {
                *stopped = true;
                debug!("stopping pool, {} tasks still queued", self.queue.len());
                // one sentinel per worker, behind all accepted tasks
                for _ in 0..self.workers.len() {
                    self.queue.push(Message::Terminate);
                }
            }
        }

        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    error!("Worker {} exited abnormally", worker.id);
                }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
