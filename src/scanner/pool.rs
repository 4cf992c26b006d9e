//! Bounded attempt pool
//!
//! A counting semaphore gates admission and a join set tracks every spawned
//! attempt until the pool is drained. Acquiring a [`Slot`] suspends while all
//! slots are taken; dropping it frees the slot for the next submission.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// One unit of in-flight capacity
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Slot {
    /// Give the slot back before the holder finishes its remaining work
    pub fn release(self) {}
}

/// Outputs of every task that ran to completion, plus a count of the ones
/// that panicked or were aborted.
#[derive(Debug)]
pub struct Drained<T> {
    pub completed: Vec<T>,
    pub failed: usize,
}

/// Fixed-capacity pool of concurrently running tasks
pub struct AttemptPool<T> {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    tasks: JoinSet<T>,
}

impl<T: Send + 'static> AttemptPool<T> {
    /// Create a pool admitting at most `capacity` tasks at once, clamped to
    /// `1..=Semaphore::MAX_PERMITS`
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            tasks: JoinSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    /// Wait for a free slot. Slots are handed out in request order.
    pub async fn acquire(&self) -> crate::Result<Slot> {
        let permit = self.semaphore.clone().acquire_owned().await?;
        Ok(Slot { _permit: permit })
    }

    /// Spawn `job` holding `slot`; the job decides when to release it
    pub fn spawn<F, Fut>(&mut self, slot: Slot, job: F)
    where
        F: FnOnce(Slot) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.tasks.spawn(job(slot));
    }

    /// Acquire a slot, then spawn `job` with it
    pub async fn submit<F, Fut>(&mut self, job: F) -> crate::Result<()>
    where
        F: FnOnce(Slot) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let slot = self.acquire().await?;
        self.spawn(slot, job);
        Ok(())
    }

    /// Wait until every spawned task has finished
    pub async fn drain(mut self) -> Drained<T> {
        let mut completed = Vec::with_capacity(self.tasks.len());
        let mut failed = 0;

        while let Some(res) = self.tasks.join_next().await {
            match res {
                Ok(output) => completed.push(output),
                Err(e) => {
                    log::error!("Pool task failed: {}", e);
                    failed += 1;
                }
            }
        }

        Drained { completed, failed }
    }
}
