use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crossbeam::channel::{bounded, Receiver, Sender};

use crate::{PoolError, Result};

/// A type-erased, zero-argument unit of work. The closure owns whatever
/// state was bound at submission time.
pub(crate) type Task = Box<dyn FnOnce() + Send + 'static>;

// Items flowing through the pool's shared queue. One Terminate is enqueued
// per worker at teardown, behind all accepted tasks, so FIFO order makes
// workers drain accepted work before exiting.
pub(crate) enum Message {
    Run(Task),
    Terminate,
}

/// One-shot handle to a submitted task's outcome.
///
/// The worker executing the task writes the outcome exactly once; `wait`
/// consumes the handle, so the at-most-one-read contract holds at compile
/// time.
pub struct TaskHandle<T> {
    receiver: Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn channel() -> (Sender<Result<T>>, TaskHandle<T>) {
        let (sender, receiver) = bounded(1);
        (sender, TaskHandle { receiver })
    }

    /// Blocks until the task's outcome is available and returns it.
    ///
    /// Yields the task's value, [`PoolError::Panicked`] if the task body
    /// panicked, or [`PoolError::Disconnected`] if the task was discarded
    /// without ever running.
    pub fn wait(self) -> Result<T> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(PoolError::Disconnected),
        }
    }
}

/// Runs a task body, converting a panic into [`PoolError::Panicked`] with
/// the payload message preserved.
pub(crate) fn run_to_outcome<F, T>(job: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(job))
        .map_err(|payload| PoolError::Panicked(panic_message(&*payload)))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
