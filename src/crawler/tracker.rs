//! Outstanding-work accounting
//!
//! A crawl is finished when nothing is queued, nothing is being fetched and
//! no link is still being evaluated. Every one of those is a unit of work in
//! the counter; the crawl is idle when the counter reaches zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts outstanding work and wakes waiters when it drains
#[derive(Debug)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl WorkTracker {
    /// Creates a tracker with `initial` units already outstanding
    pub fn new(initial: usize) -> Self {
        Self {
            outstanding: AtomicUsize::new(initial),
            idle: Notify::new(),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Registers one more unit of work
    pub fn add(&self) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    /// Completes one unit of work, waking waiters if it was the last
    pub fn done(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "work counter underflow");
        if previous == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Waits until the counter reaches zero
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent `done` cannot slip
            // between the check and the wait.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Releases one unit of work when dropped
///
/// Travels with a task through the queue and into its crawl unit, so the
/// count is released even if the unit panics or the task is dropped unread.
#[derive(Debug)]
pub struct WorkGuard {
    tracker: Arc<WorkTracker>,
}

impl WorkGuard {
    /// Registers a new unit of work and returns its guard
    pub fn new(tracker: Arc<WorkTracker>) -> Self {
        tracker.add();
        Self { tracker }
    }

    /// Takes ownership of one already-registered unit
    pub fn adopt(tracker: Arc<WorkTracker>) -> Self {
        Self { tracker }
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.tracker.done();
    }
}
