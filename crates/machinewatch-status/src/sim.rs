//! In-memory status source.
//!
//! [`SimStatusSource`] stands in for the control system: tests and host
//! applications mutate the live status through a [`SimStatusHandle`] and the
//! watcher sees it on its next poll.

use parking_lot::Mutex;
use std::sync::Arc;

use machinewatch_core::{StatusSnapshot, TransportError};

use crate::source::StatusSource;

#[derive(Debug, Default)]
struct SimFeed {
    live: StatusSnapshot,
    failures: usize,
    polls: u64,
}

/// Status source backed by a shared in-memory snapshot
#[derive(Debug)]
pub struct SimStatusSource {
    feed: Arc<Mutex<SimFeed>>,
    current: StatusSnapshot,
}

/// Handle for driving a [`SimStatusSource`] from outside the watcher
#[derive(Debug, Clone)]
pub struct SimStatusHandle {
    feed: Arc<Mutex<SimFeed>>,
}

impl SimStatusSource {
    /// Create a source whose live status starts as `initial`
    pub fn new(initial: StatusSnapshot) -> Self {
        Self {
            feed: Arc::new(Mutex::new(SimFeed {
                live: initial.clone(),
                ..Default::default()
            })),
            current: initial,
        }
    }

    /// Handle sharing this source's live status
    pub fn handle(&self) -> SimStatusHandle {
        SimStatusHandle {
            feed: self.feed.clone(),
        }
    }
}

impl Default for SimStatusSource {
    fn default() -> Self {
        Self::new(StatusSnapshot::default())
    }
}

impl StatusSource for SimStatusSource {
    fn poll(&mut self) -> Result<(), TransportError> {
        let mut feed = self.feed.lock();
        feed.polls += 1;
        if feed.failures > 0 {
            feed.failures -= 1;
            return Err(TransportError::new("simulated transport failure"));
        }
        self.current = feed.live.clone();
        Ok(())
    }

    fn snapshot(&self) -> &StatusSnapshot {
        &self.current
    }
}

impl SimStatusHandle {
    /// Mutate the live status
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut StatusSnapshot),
    {
        f(&mut self.feed.lock().live);
    }

    /// Replace the live status
    pub fn set(&self, snapshot: StatusSnapshot) {
        self.feed.lock().live = snapshot;
    }

    /// Copy of the live status
    pub fn live(&self) -> StatusSnapshot {
        self.feed.lock().live.clone()
    }

    /// Make the next `count` polls fail with a transport error
    pub fn fail_next_polls(&self, count: usize) {
        self.feed.lock().failures = count;
    }

    /// Number of polls attempted so far
    pub fn poll_count(&self) -> u64 {
        self.feed.lock().polls
    }
}
