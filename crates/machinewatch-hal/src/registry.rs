//! Registry of live observed pins and their shared poll timer.
//!
//! Every observed pin in the process is registered here. One timer polls the
//! whole registry; it is started by the first registration and stops itself
//! on the tick after [`PinRegistry::stop_polling`].

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use machinewatch_core::{PinValue, Scheduler, SchedulerError, TickCallback};

use crate::pin::WatchedPin;

/// Default interval between registry polls
pub const DEFAULT_PIN_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of one pass over the registry
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollReport {
    /// Pins polled this pass
    pub polled: usize,
    /// Pins whose value changed, with the new value
    pub changed: Vec<(String, PinValue)>,
    /// Pins evicted because they could not be read
    pub evicted: Vec<String>,
}

/// Process-wide set of observed pins
pub struct PinRegistry {
    pins: Mutex<Vec<Arc<WatchedPin>>>,
    polling: AtomicBool,
    interval: Duration,
    timer: Mutex<Box<dyn Scheduler>>,
}

impl PinRegistry {
    /// Create an empty registry polled by `timer` every `interval`
    pub fn new(timer: Box<dyn Scheduler>, interval: Duration) -> Self {
        Self {
            pins: Mutex::new(Vec::new()),
            polling: AtomicBool::new(false),
            interval,
            timer: Mutex::new(timer),
        }
    }

    /// Add a pin and make sure polling is running
    pub fn register(self: &Arc<Self>, pin: Arc<WatchedPin>) {
        tracing::debug!("Registering pin {}", pin.full_name());
        self.pins.lock().push(pin);
        if let Err(e) = self.start_polling() {
            tracing::warn!("Pin polling not started: {}", e);
        }
    }

    /// Remove a pin by its full name
    pub fn deregister(&self, full_name: &str) -> bool {
        let mut pins = self.pins.lock();
        let before = pins.len();
        pins.retain(|pin| pin.full_name() != full_name);
        pins.len() != before
    }

    /// Start the shared timer
    ///
    /// Returns `Ok(false)` if polling was already active.
    pub fn start_polling(self: &Arc<Self>) -> Result<bool, SchedulerError> {
        if self.polling.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        let mut timer = self.timer.lock();
        let mut started = timer.start(self.interval, self.poll_callback());
        if started == Err(SchedulerError::AlreadyRunning) {
            // The old timer may already have seen the cleared flag and be exiting
            timer.stop();
            started = timer.start(self.interval, self.poll_callback());
        }
        drop(timer);

        match started {
            Ok(()) => {
                tracing::info!("Pin polling started every {:?}", self.interval);
                Ok(true)
            }
            Err(e) => {
                self.polling.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn poll_callback(self: &Arc<Self>) -> TickCallback {
        let registry = Arc::downgrade(self);
        Box::new(move || {
            registry
                .upgrade()
                .is_some_and(|registry| registry.update_all())
        })
    }

    /// Clear the polling flag; the timer stops on its next tick
    pub fn stop_polling(&self) {
        if self.polling.swap(false, Ordering::SeqCst) {
            tracing::info!("Pin polling stopped");
        }
    }

    /// Check if polling is active
    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::SeqCst)
    }

    /// Poll every registered pin once
    ///
    /// Returns whether polling should continue. Does nothing (and returns
    /// false) when polling is not active.
    pub fn update_all(&self) -> bool {
        if !self.is_polling() {
            return false;
        }
        self.poll_pass();
        self.is_polling()
    }

    /// Poll every registered pin once and report what happened
    ///
    /// Pins that fail to read are evicted after the full pass. Notifications
    /// are delivered after the registry lock is released.
    pub fn poll_pass(&self) -> PollReport {
        let mut report = PollReport::default();
        let mut changed = Vec::new();
        {
            let mut pins = self.pins.lock();
            let mut stale = Vec::new();
            for (index, pin) in pins.iter().enumerate() {
                report.polled += 1;
                match pin.poll_once() {
                    Ok(Some(value)) => changed.push((pin.clone(), value)),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Error updating pin {}; removing: {}", pin, e);
                        stale.push(index);
                    }
                }
            }
            for index in stale.into_iter().rev() {
                report.evicted.push(pins.remove(index).full_name());
            }
            report.evicted.reverse();
        }

        for (pin, value) in changed {
            report.changed.push((pin.full_name(), value));
            pin.value_changed().emit(&value);
        }
        report
    }

    /// Number of registered pins
    pub fn len(&self) -> usize {
        self.pins.lock().len()
    }

    /// Check if no pins are registered
    pub fn is_empty(&self) -> bool {
        self.pins.lock().is_empty()
    }

    /// Check if a pin is registered, by full name
    pub fn contains(&self, full_name: &str) -> bool {
        self.pins
            .lock()
            .iter()
            .any(|pin| pin.full_name() == full_name)
    }

    /// Snapshot of the registered pins
    pub fn pins(&self) -> Vec<Arc<WatchedPin>> {
        self.pins.lock().clone()
    }

    /// Drop every registered pin
    pub fn clear(&self) {
        self.pins.lock().clear();
    }

    /// Interval between polls
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check if the underlying timer is still repeating
    pub fn is_timer_running(&self) -> bool {
        self.timer.lock().is_running()
    }
}

impl std::fmt::Debug for PinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinRegistry")
            .field("pins", &self.len())
            .field("polling", &self.is_polling())
            .field("interval", &self.interval)
            .finish()
    }
}
