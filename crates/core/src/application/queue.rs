// Bounded Task Queue
// One mutex, two condition variables, one stop flag

use crate::application::worker::StopSignal;
use crate::domain::TaskToken;
use crate::error::{PoolError, Result};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Capacity-bounded FIFO of task tokens shared by producers and workers
///
/// Producers block in [`submit`](Self::submit) while the queue is full,
/// workers block in [`try_dequeue`](Self::try_dequeue) while it is empty.
/// [`request_stop`](Self::request_stop) wakes everybody: producers give up,
/// workers keep draining until the queue is empty.
#[derive(Debug)]
pub struct BoundedTaskQueue {
    items: Mutex<VecDeque<TaskToken>>,
    capacity: usize,
    /// Producers wait here for a free slot
    slots_available: Condvar,
    /// Workers wait here for a token
    items_available: Condvar,
    stop: StopSignal,
}

impl BoundedTaskQueue {
    /// Create a queue holding at most `capacity` tokens
    ///
    /// # Errors
    /// `PoolError::Config` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(PoolError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            slots_available: Condvar::new(),
            items_available: Condvar::new(),
            stop: StopSignal::new(),
        })
    }

    /// Enqueue a token, blocking while the queue is full
    ///
    /// Returns false without enqueuing once stop has been requested,
    /// including for producers that were already blocked.
    pub fn submit(&self, token: TaskToken) -> bool {
        let items = self.lock();
        let mut items = self
            .slots_available
            .wait_while(items, |items| {
                items.len() >= self.capacity && !self.stop.is_stopped()
            })
            .unwrap_or_else(PoisonError::into_inner);

        if self.stop.is_stopped() {
            debug!(token = %token, "Submission rejected: queue is stopping");
            return false;
        }

        items.push_back(token);
        drop(items);

        self.items_available.notify_one();
        true
    }

    /// Take the front token, blocking while the queue is empty
    ///
    /// Returns `None` only when stop was requested and nothing is left,
    /// which tells the calling worker to exit.
    pub fn try_dequeue(&self) -> Option<TaskToken> {
        let items = self.lock();
        let mut items = self
            .items_available
            .wait_while(items, |items| items.is_empty() && !self.stop.is_stopped())
            .unwrap_or_else(PoisonError::into_inner);

        let token = items.pop_front()?;
        drop(items);

        self.slots_available.notify_one();
        Some(token)
    }

    /// Raise the stop flag and wake every blocked producer and worker
    ///
    /// Returns true for the call that actually raised the flag.
    pub fn request_stop(&self) -> bool {
        let items = self.lock();
        let first = self.stop.trigger();
        drop(items);

        self.items_available.notify_all();
        self.slots_available.notify_all();
        first
    }

    /// Lock-free read of the stop flag
    pub fn is_stopping(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // No code panics while holding this lock, but a poisoned queue is still
    // structurally valid, so keep going rather than cascade the panic.
    fn lock(&self) -> MutexGuard<'_, VecDeque<TaskToken>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
