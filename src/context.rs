//! The watch context: owner of the pin registry, the status watcher and
//! their timers.
//!
//! One context is built at application start-up and handed to whatever needs
//! to observe pins or status.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use machinewatch_core::{Scheduler, SchedulerError, TokioScheduler};
use machinewatch_hal::{HalComponent, HalLayer, PinRegistry};
use machinewatch_settings::WatchConfig;
use machinewatch_status::{StatusSource, StatusWatcher, WatcherOptions};

type WatcherSlot = Arc<Mutex<Option<Arc<StatusWatcher>>>>;

/// Process context for pin and status watching
pub struct WatchContext {
    config: WatchConfig,
    pins: Arc<PinRegistry>,
    status: WatcherSlot,
    status_timer: Mutex<Box<dyn Scheduler>>,
    running: AtomicBool,
}

impl WatchContext {
    /// Create a context driven by tokio timers
    ///
    /// The timers need a tokio runtime when they start.
    pub fn new(config: WatchConfig) -> Self {
        Self::with_schedulers(
            config,
            Box::new(TokioScheduler::new()),
            Box::new(TokioScheduler::new()),
        )
    }

    /// Create a context driven by the given timers
    pub fn with_schedulers(
        config: WatchConfig,
        pin_timer: Box<dyn Scheduler>,
        status_timer: Box<dyn Scheduler>,
    ) -> Self {
        let pins = Arc::new(PinRegistry::new(pin_timer, config.polling.pin_interval()));
        Self {
            config,
            pins,
            status: Arc::new(Mutex::new(None)),
            status_timer: Mutex::new(status_timer),
            running: AtomicBool::new(false),
        }
    }

    /// Configuration this context was built with
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// The live-pin registry
    pub fn pins(&self) -> Arc<PinRegistry> {
        self.pins.clone()
    }

    /// A HAL component whose pins are polled by this context
    pub fn component(&self, layer: Arc<dyn HalLayer>, name: impl Into<String>) -> HalComponent {
        HalComponent::new(layer, name, self.pins.clone())
    }

    /// The status watcher, created from `factory` on first use
    ///
    /// Later calls return the existing watcher and never call their factory.
    pub fn status_watcher<F>(&self, factory: F) -> Arc<StatusWatcher>
    where
        F: FnOnce() -> Box<dyn StatusSource>,
    {
        let mut slot = self.status.lock();
        if let Some(watcher) = slot.as_ref() {
            return watcher.clone();
        }

        let options = WatcherOptions {
            override_limit_joints: self.config.status.override_limit_joints,
            jog_rate: self.config.jog.default_rate,
        };
        let watcher = Arc::new(StatusWatcher::with_options(factory(), options));
        tracing::debug!("Status watcher created");
        *slot = Some(watcher.clone());
        watcher
    }

    /// The status watcher, if one has been created
    pub fn current_status_watcher(&self) -> Option<Arc<StatusWatcher>> {
        self.status.lock().clone()
    }

    /// Start the status timer, and pin polling if any pins exist
    ///
    /// Starting a running context does nothing.
    pub fn start(&self) -> Result<(), SchedulerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let slot = self.status.clone();
        let started = self.status_timer.lock().start(
            self.config.polling.status_interval(),
            Box::new(move || {
                let watcher = slot.lock().clone();
                if let Some(watcher) = watcher {
                    watcher.update();
                }
                true
            }),
        );
        if let Err(e) = started {
            self.running.store(false, Ordering::SeqCst);
            return Err(e);
        }

        if !self.pins.is_empty() {
            if let Err(e) = self.pins.start_polling() {
                self.stop();
                return Err(e);
            }
        }

        tracing::info!(
            "Watch context started (status every {:?})",
            self.config.polling.status_interval()
        );
        Ok(())
    }

    /// Stop both timers; in-flight cycles finish normally
    pub fn stop(&self) {
        self.pins.stop_polling();
        self.status_timer.lock().stop();
        if self.running.swap(false, Ordering::SeqCst) {
            tracing::info!("Watch context stopped");
        }
    }

    /// Stop, then drop every registered pin and the status watcher
    pub fn shutdown(&self) {
        self.stop();
        self.pins.clear();
        self.status.lock().take();
        tracing::info!("Watch context shut down");
    }

    /// Check if the status timer is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for WatchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchContext")
            .field("running", &self.is_running())
            .field("pins", &self.pins)
            .field("has_status_watcher", &self.status.lock().is_some())
            .finish()
    }
}
