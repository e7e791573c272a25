use std::io;

use thiserror::Error;

/// WorkerPool Error
#[derive(Error, Debug)]
pub enum PoolError {
    /// Submission rejected because the pool has begun shutting down
    #[error("pool is stopped")]
    Stopped,
    /// The task body panicked while running on a worker
    #[error("task panicked: {0}")]
    Panicked(String),
    /// The task was dropped before an outcome was written to its handle
    #[error("task result channel disconnected")]
    Disconnected,
    /// The pool was constructed with zero workers
    #[error("pool requires at least one worker")]
    NoWorkers,
    /// IO Error raised while spawning a worker thread
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// WorkerPool Error Result
pub type Result<T> = std::result::Result<T, PoolError>;
