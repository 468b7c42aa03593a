//! The status watcher: poll, derive, diff, notify.
//!
//! Each [`StatusWatcher::update`] runs one cycle under the watcher lock and
//! delivers the resulting events after releasing it, so subscribers may call
//! back into the watcher.

use parking_lot::Mutex;
use std::time::Duration;

use machinewatch_core::FieldError;

use crate::derived::DerivedState;
use crate::diff::{diff_states, forced_events};
use crate::events::{StatusEvent, StatusSignals};
use crate::fields::{FieldValue, StatusField};
use crate::source::StatusSource;

/// Default interval between status cycles
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(100);

/// Default jog rate in units per minute
pub const DEFAULT_JOG_RATE: f64 = 15.0;

/// Default number of joints whose override-limit flags are reported
pub const DEFAULT_OVERRIDE_LIMIT_JOINTS: usize = 8;

/// Construction options for a [`StatusWatcher`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatcherOptions {
    /// Joints reported in the override-limits event
    pub override_limit_joints: usize,
    /// Initial jog rate
    pub jog_rate: f64,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            override_limit_joints: DEFAULT_OVERRIDE_LIMIT_JOINTS,
            jog_rate: DEFAULT_JOG_RATE,
        }
    }
}

/// Result of one watcher cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran and delivered this many events
    Completed { events: usize },
    /// The status source could not be polled; try again next tick
    Retry,
}

impl CycleOutcome {
    /// Check if the cycle was abandoned
    pub fn is_retry(&self) -> bool {
        matches!(self, CycleOutcome::Retry)
    }
}

struct WatcherState {
    source: Box<dyn StatusSource>,
    previous: Option<DerivedState>,
    baseline_sent: bool,
    jog_rate: f64,
    cycles: u64,
}

/// Watches one status source and notifies on every change
pub struct StatusWatcher {
    state: Mutex<WatcherState>,
    signals: StatusSignals,
    override_limit_joints: usize,
}

impl StatusWatcher {
    /// Create a watcher with default options
    pub fn new(source: Box<dyn StatusSource>) -> Self {
        Self::with_options(source, WatcherOptions::default())
    }

    /// Create a watcher
    pub fn with_options(source: Box<dyn StatusSource>, options: WatcherOptions) -> Self {
        Self {
            state: Mutex::new(WatcherState {
                source,
                previous: None,
                baseline_sent: false,
                jog_rate: options.jog_rate,
                cycles: 0,
            }),
            signals: StatusSignals::new(),
            override_limit_joints: options.override_limit_joints,
        }
    }

    /// Notification channels
    pub fn signals(&self) -> &StatusSignals {
        &self.signals
    }

    /// Run one poll-diff-notify cycle
    ///
    /// A transport failure abandons the cycle silently: nothing is emitted
    /// and the previous state is kept for the next attempt. The first
    /// completed cycle diffs against nothing, so every field is announced
    /// together with the estop/off/idle baseline.
    pub fn update(&self) -> CycleOutcome {
        let events = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if state.source.poll().is_err() {
                return CycleOutcome::Retry;
            }

            let snapshot = state.source.snapshot();
            let new = DerivedState::from_snapshot(
                snapshot,
                state.previous.as_ref(),
                self.override_limit_joints,
            );
            let old = if state.baseline_sent {
                state.previous.as_ref()
            } else {
                None
            };
            let events = diff_states(old, &new, snapshot);

            state.previous = Some(new);
            state.baseline_sent = true;
            state.cycles += 1;
            events
        };

        self.deliver(&events);
        CycleOutcome::Completed {
            events: events.len(),
        }
    }

    /// Re-poll and re-send the refresh catalogue regardless of changes
    ///
    /// The new state is recorded, so the next regular cycle diffs against it.
    pub fn force_refresh(&self) -> CycleOutcome {
        let events = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if state.source.poll().is_err() {
                return CycleOutcome::Retry;
            }

            let new = DerivedState::from_snapshot(
                state.source.snapshot(),
                state.previous.as_ref(),
                self.override_limit_joints,
            );
            let events = forced_events(&new, state.jog_rate);
            state.previous = Some(new);
            events
        };

        tracing::debug!("Forced status refresh: {} events", events.len());
        self.deliver(&events);
        CycleOutcome::Completed {
            events: events.len(),
        }
    }

    /// Set the jog rate and announce it, changed or not
    pub fn set_jog_rate(&self, rate: f64) {
        self.state.lock().jog_rate = rate;
        self.signals.dispatch(&StatusEvent::JogRateChanged(rate));
    }

    /// Current jog rate
    pub fn jog_rate(&self) -> f64 {
        self.state.lock().jog_rate
    }

    /// Ask preview and source views to reload the current program
    pub fn request_reload_display(&self) {
        self.signals.dispatch(&StatusEvent::ReloadDisplay);
    }

    /// State recorded by the last cycle
    pub fn derived(&self) -> Option<DerivedState> {
        self.state.lock().previous.clone()
    }

    /// Completed regular cycles
    pub fn cycle_count(&self) -> u64 {
        self.state.lock().cycles
    }

    /// Read a field
    ///
    /// Before the first cycle derived fields read as their defaults.
    pub fn get(&self, field: StatusField) -> FieldValue {
        let state = self.state.lock();
        let value = match &state.previous {
            Some(derived) => derived.field(field),
            None => DerivedState::default().field(field),
        };
        value.unwrap_or(FieldValue::Float(state.jog_rate))
    }

    /// Overwrite a field without notifying
    ///
    /// Derived fields are overwritten in the recorded state, so the next
    /// cycle diffs the live status against the assigned value.
    pub fn set(&self, field: StatusField, value: FieldValue) -> Result<(), FieldError> {
        let mut state = self.state.lock();
        match (field, value) {
            (StatusField::JogRate, FieldValue::Float(rate)) => {
                state.jog_rate = rate;
                Ok(())
            }
            (StatusField::JogRate, _) => Err(FieldError::TypeMismatch {
                field: field.name().to_string(),
                expected: "float".to_string(),
            }),
            (field, value) => state
                .previous
                .get_or_insert_with(DerivedState::default)
                .set_field(field, value),
        }
    }

    /// Read a field by name
    pub fn get_by_name(&self, name: &str) -> Result<FieldValue, FieldError> {
        Ok(self.get(name.parse()?))
    }

    /// Overwrite a field by name
    pub fn set_by_name(&self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        self.set(name.parse()?, value)
    }

    fn deliver(&self, events: &[StatusEvent]) {
        for event in events {
            self.signals.dispatch(event);
        }
    }
}

impl std::fmt::Debug for StatusWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("StatusWatcher")
            .field("cycles", &state.cycles)
            .field("jog_rate", &state.jog_rate)
            .field("override_limit_joints", &self.override_limit_joints)
            .finish()
    }
}
