use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

// Flag and items share one mutex so that shutdown can discard pending
// items and release waiters as a single step.
struct Inner<T> {
    items: VecDeque<T>,
    shutdown: bool,
}

/// A thread-safe FIFO queue with blocking consumption.
///
/// Any number of producers and consumers may share the queue by reference.
/// `pop` blocks until an item arrives or the queue is shut down; `shutdown`
/// releases every blocked consumer and discards whatever is still pending.
///
/// # Example:
///
/// ```
/// use workpool::BlockingQueue;
///
/// let queue = BlockingQueue::new();
/// queue.push(1);
/// queue.push(2);
/// assert_eq!(Some(1), queue.pop());
///
/// // shutdown discards the pending 2 and unblocks consumers
/// queue.shutdown();
/// assert_eq!(None, queue.pop());
/// ```
pub struct BlockingQueue<T> {
    inner: Mutex<Inner<T>>,
    available: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Creates an empty open queue.
    pub fn new() -> Self {
        BlockingQueue {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends an item at the tail and wakes one waiting consumer.
    ///
    /// Always succeeds. Items pushed after `shutdown` are retained and stay
    /// available to `pop`; only items pending at the moment of shutdown are
    /// discarded.
    pub fn push(&self, item: T) {
        let mut inner = self.inner.lock().unwrap();
        inner.items.push_back(item);
        drop(inner);
        self.available.notify_one();
    }

    /// Removes and returns the head item, blocking while the queue is open
    /// and empty.
    ///
    /// Returns `None` once the queue has been shut down and holds no items,
    /// so a closed queue is distinguishable from any legitimate payload.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        while !inner.shutdown && inner.items.is_empty() {
            inner = self.available.wait(inner).unwrap();
        }
        inner.items.pop_front()
    }

    /// Returns the number of pending items.
    ///
    /// Advisory only: the count may be stale as soon as it is returned.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    /// Returns whether the queue holds no pending items. Advisory, like
    /// [`len`](BlockingQueue::len).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shuts the queue down: discards all pending items and releases every
    /// blocked consumer with `None`.
    ///
    /// Idempotent; a second call is a no-op. Items pending at the moment of
    /// shutdown are lost, not delivered.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.shutdown {
            return;
        }
        inner.shutdown = true;
        inner.items.clear();
        drop(inner);
        self.available.notify_all();
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = BlockingQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(Some(1), queue.pop());
        assert_eq!(Some(2), queue.pop());
        assert_eq!(Some(3), queue.pop());
    }

    #[test]
    fn test_len_tracks_push_and_pop() {
        let queue = BlockingQueue::new();
        assert_eq!(0, queue.len());
        assert!(queue.is_empty());
        queue.push("hello");
        assert_eq!(1, queue.len());
        queue.push("world");
        assert_eq!(2, queue.len());
        queue.pop();
        assert_eq!(1, queue.len());
        queue.pop();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let queue: BlockingQueue<i32> = BlockingQueue::new();
        queue.shutdown();
        queue.shutdown();
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn test_push_after_shutdown_is_retained() {
        let queue = BlockingQueue::new();
        queue.shutdown();
        queue.push(7);
        assert_eq!(1, queue.len());
        assert_eq!(Some(7), queue.pop());
        assert_eq!(None, queue.pop());
    }
}
