#![deny(missing_docs)]
//! A fixed-size worker thread pool built on a blocking task queue
//!
//! Two cooperating pieces: [`BlockingQueue`] is a mutex/condvar FIFO with
//! blocking consumption and a one-way drain-on-shutdown transition, and
//! [`WorkerPool`] runs submitted closures on a fixed set of worker threads
//! pulling from a shared `BlockingQueue`, handing back a [`TaskHandle`] for
//! each result.
//!
//! ```
//! use workpool::WorkerPool;
//!
//! let pool = WorkerPool::new(4).unwrap();
//! let handle = pool.submit(|| 1 + 2).unwrap();
//! assert_eq!(3, handle.wait().unwrap());
//! ```

mod error;
mod queue;
/// Thread Pool
pub mod thread_pool;

pub use error::{PoolError, Result};
pub use queue::BlockingQueue;
pub use thread_pool::{TaskHandle, WorkerPool};
