//! Periodic timers that drive poll cycles.
//!
//! A [`Scheduler`] repeatedly invokes one callback at a fixed interval until
//! the callback returns `false` or [`Scheduler::stop`] is called. Cycles never
//! overlap: the next tick is not taken until the previous callback returned.
//!
//! Two implementations are provided:
//! - [`TokioScheduler`] runs the callback on a tokio task.
//! - [`ManualScheduler`] stores the callback and runs it when the host event
//!   loop calls [`ManualScheduler::tick`] (e.g. from a GUI toolkit timeout).

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::SchedulerError;

/// Callback run once per tick; returning `false` stops the timer
pub type TickCallback = Box<dyn FnMut() -> bool + Send + 'static>;

/// A repeating timer
pub trait Scheduler: Send {
    /// Start invoking `callback` every `interval`
    fn start(&mut self, interval: Duration, callback: TickCallback) -> Result<(), SchedulerError>;

    /// Stop repeating; a cycle already in progress runs to completion
    fn stop(&mut self);

    /// Check if the timer is currently repeating
    fn is_running(&self) -> bool;
}

/// Timer backed by a tokio task
#[derive(Debug, Default)]
pub struct TokioScheduler {
    task: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl TokioScheduler {
    /// Create a stopped timer
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TokioScheduler {
    fn start(
        &mut self,
        interval: Duration,
        mut callback: TickCallback,
    ) -> Result<(), SchedulerError> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;

        let running = Arc::new(AtomicBool::new(true));
        self.running = running.clone();
        self.task = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                if !callback() {
                    running.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }));
        tracing::debug!("Timer started with {:?} interval", interval);
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Timer stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Default)]
struct ManualState {
    interval: Option<Duration>,
    callback: Option<TickCallback>,
    generation: u64,
    ticks: u64,
}

/// Timer driven explicitly by the host event loop
///
/// Clones share the same timer, so one clone can be handed to a watcher while
/// another is kept by the code that calls [`tick`](Self::tick).
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    /// Create a stopped timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one cycle now
    ///
    /// Returns whether the timer is still running afterwards. A tick issued
    /// while another tick is in progress does nothing.
    pub fn tick(&self) -> bool {
        let (mut callback, generation) = {
            let mut state = self.state.lock();
            match state.callback.take() {
                Some(callback) => (callback, state.generation),
                None => return false,
            }
        };

        let keep_going = callback();

        let mut state = self.state.lock();
        state.ticks += 1;
        // A stop() or start() from inside the callback wins
        if state.generation == generation {
            if keep_going {
                state.callback = Some(callback);
            } else {
                state.interval = None;
                state.generation += 1;
            }
        }
        state.callback.is_some()
    }

    /// Interval requested by the last `start`
    pub fn interval(&self) -> Option<Duration> {
        self.state.lock().interval
    }

    /// Number of ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.state.lock().ticks
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, interval: Duration, callback: TickCallback) -> Result<(), SchedulerError> {
        let mut state = self.state.lock();
        if state.callback.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }
        state.interval = Some(interval);
        state.callback = Some(callback);
        state.generation += 1;
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.state.lock();
        state.callback = None;
        state.interval = None;
        state.generation += 1;
    }

    fn is_running(&self) -> bool {
        let state = self.state.lock();
        state.callback.is_some() || state.interval.is_some()
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("interval", &state.interval)
            .field("ticks", &state.ticks)
            .finish()
    }
}
