//! Change detection between two derived states.
//!
//! [`diff_states`] produces the events for one regular cycle and
//! [`forced_events`] the catalogue re-sent to a freshly attached UI. Both are
//! pure; the watcher delivers the returned events in order.

use machinewatch_core::{InterpState, StatusSnapshot, TaskState};

use crate::decode::HomingSummary;
use crate::derived::DerivedState;
use crate::events::StatusEvent;

/// `Some(new value)` when the field differs from the previous cycle or there
/// was no previous cycle
fn changed<T, F>(old: Option<&DerivedState>, new: &DerivedState, field: F) -> Option<T>
where
    T: PartialEq,
    F: Fn(&DerivedState) -> T,
{
    let value = field(new);
    match old {
        Some(old) if field(old) == value => None,
        _ => Some(value),
    }
}

/// Events for one cycle, in delivery order
///
/// `old` is the previous cycle's state, or `None` on the first cycle, which
/// also emits the baseline estop/off/idle triad. `snapshot` supplies the
/// continuously reported values and the raw interpreter state that gates
/// file notifications.
pub fn diff_states(
    old: Option<&DerivedState>,
    new: &DerivedState,
    snapshot: &StatusSnapshot,
) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    let state_old = old.map(|o| o.state);
    let mut mode_old = old.map(|o| o.mode);
    let mut interp_old = old.map(|o| o.interp);

    if state_old.is_none() {
        events.push(if new.state.is_estop_reset() {
            StatusEvent::StateEstopReset
        } else {
            StatusEvent::StateEstop
        });
        events.push(StatusEvent::StateOff);
        events.push(StatusEvent::InterpIdle);
    }

    if state_old != Some(new.state) {
        if state_old == Some(TaskState::On) && new.state < TaskState::On {
            events.push(StatusEvent::StateOff);
        }
        events.push(StatusEvent::for_state(new.state));
        // Machine on: re-announce mode and interpreter
        if new.state == TaskState::On {
            mode_old = None;
            interp_old = None;
        }
    }

    if mode_old != Some(new.mode) {
        events.push(StatusEvent::for_mode(new.mode));
    }

    if interp_old != Some(new.interp) {
        if matches!(interp_old, None | Some(InterpState::Idle)) {
            events.push(StatusEvent::InterpRun);
        }
        events.push(StatusEvent::for_interp(new.interp));
    }

    if let Some(v) = changed(old, new, |s| s.paused) {
        events.push(StatusEvent::ProgramPauseChanged(v));
    }
    if let Some(v) = changed(old, new, |s| s.block_delete) {
        events.push(StatusEvent::BlockDeleteChanged(v));
    }
    if let Some(v) = changed(old, new, |s| s.optional_stop) {
        events.push(StatusEvent::OptionalStopChanged(v));
    }

    // A changed file is recorded either way but only announced when idle
    if let Some(file) = changed(old, new, |s| s.file.clone()) {
        if !snapshot.interp_state.is_running() {
            events.push(StatusEvent::FileLoaded(file));
        }
    }

    if let Some(v) = changed(old, new, |s| s.line) {
        events.push(StatusEvent::LineChanged(v));
    }
    if let Some(v) = changed(old, new, |s| s.tool_in_spindle) {
        events.push(StatusEvent::ToolInSpindleChanged(v));
    }

    if let Some(homed) = changed(old, new, |s| s.homed.clone()) {
        events.extend(homing_events(&homed, snapshot.axis_mask));
    }

    if let Some(flags) = changed(old, new, |s| s.override_limits.clone()) {
        events.push(StatusEvent::OverrideLimitsChanged(flags));
    }

    events.push(StatusEvent::CurrentFeedRate(snapshot.feed_rate_per_minute()));
    events.push(StatusEvent::CurrentXRelPosition(snapshot.x_relative_position()));

    if let Some((enabled, direction)) =
        changed(old, new, |s| (s.spindle_enabled, s.spindle_direction))
    {
        events.push(StatusEvent::SpindleControlChanged(enabled, direction));
    }

    if let Some(v) = changed(old, new, |s| s.spindle_override) {
        events.push(StatusEvent::SpindleOverrideChanged(v * 100.0));
    }
    if let Some(v) = changed(old, new, |s| s.feed_override) {
        events.push(StatusEvent::FeedOverrideChanged(v * 100.0));
    }
    if let Some(v) = changed(old, new, |s| s.rapid_override) {
        events.push(StatusEvent::RapidOverrideChanged(v * 100.0));
    }
    if let Some(v) = changed(old, new, |s| s.feed_hold) {
        events.push(StatusEvent::FeedHoldEnabledChanged(v));
    }
    if let Some(v) = changed(old, new, |s| s.g5x_index) {
        events.push(StatusEvent::UserSystemChanged(v));
    }

    if let Some(v) = changed(old, new, |s| s.modes.itime) {
        events.push(StatusEvent::ItimeMode(v));
    }
    if let Some(v) = changed(old, new, |s| s.modes.fpm) {
        events.push(StatusEvent::FpmMode(v));
    }
    if let Some(v) = changed(old, new, |s| s.modes.fpr) {
        events.push(StatusEvent::FprMode(v));
    }
    if let Some(v) = changed(old, new, |s| s.modes.css) {
        events.push(StatusEvent::CssMode(v));
    }
    if let Some(v) = changed(old, new, |s| s.modes.rpm) {
        events.push(StatusEvent::RpmMode(v));
    }
    if let Some(v) = changed(old, new, |s| s.modes.radius) {
        events.push(StatusEvent::RadiusMode(v));
    }
    if let Some(v) = changed(old, new, |s| s.modes.diameter) {
        events.push(StatusEvent::DiameterMode(v));
    }
    if let Some(v) = changed(old, new, |s| s.m_code.clone()) {
        events.push(StatusEvent::MCodeChanged(v));
    }
    if let Some(v) = changed(old, new, |s| s.g_code.clone()) {
        events.push(StatusEvent::GCodeChanged(v));
    }
    if let Some(v) = changed(old, new, |s| s.modes.metric) {
        events.push(StatusEvent::MetricModeChanged(v));
    }

    events.push(StatusEvent::WidgetUpdate);
    events
}

/// Events announcing a new homed vector
pub fn homing_events(homed: &[bool], axis_mask: u32) -> Vec<StatusEvent> {
    let summary = HomingSummary::compute(homed, axis_mask);
    let mut events = Vec::with_capacity(2);
    if summary.any_homed() {
        events.push(StatusEvent::Homed(summary.homed.clone()));
    }
    if summary.all_homed() {
        events.push(StatusEvent::AllHomed);
    } else {
        events.push(StatusEvent::NotAllHomed(summary.unhomed));
    }
    events
}

/// The catalogue re-sent by a forced refresh
///
/// Mode flags that enable a mode (css, rpm, itime, fpm, fpr, metric) are only
/// sent while true; radius and diameter are always sent.
pub fn forced_events(state: &DerivedState, jog_rate: f64) -> Vec<StatusEvent> {
    let mut events = vec![
        StatusEvent::JogRateChanged(jog_rate),
        StatusEvent::OverrideLimitsChanged(state.override_limits.clone()),
        StatusEvent::FeedOverrideChanged(state.feed_override * 100.0),
        StatusEvent::RapidOverrideChanged(state.rapid_override * 100.0),
        StatusEvent::SpindleOverrideChanged(state.spindle_override * 100.0),
    ];

    let modes = state.modes;
    if modes.css {
        events.push(StatusEvent::CssMode(true));
    }
    if modes.rpm {
        events.push(StatusEvent::RpmMode(true));
    }
    if modes.itime {
        events.push(StatusEvent::ItimeMode(true));
    }
    if modes.fpm {
        events.push(StatusEvent::FpmMode(true));
    }
    if modes.fpr {
        events.push(StatusEvent::FprMode(true));
    }

    events.push(StatusEvent::ProgramPauseChanged(state.paused));
    events.push(StatusEvent::BlockDeleteChanged(state.block_delete));
    events.push(StatusEvent::OptionalStopChanged(state.optional_stop));
    if state.g5x_index != 0 {
        events.push(StatusEvent::UserSystemChanged(state.g5x_index));
    }
    events.push(StatusEvent::RadiusMode(modes.radius));
    events.push(StatusEvent::DiameterMode(modes.diameter));
    events.push(StatusEvent::MCodeChanged(state.m_code.clone()));
    events.push(StatusEvent::GCodeChanged(state.g_code.clone()));
    if modes.metric {
        events.push(StatusEvent::MetricModeChanged(true));
    }
    events.push(StatusEvent::ToolInSpindleChanged(state.tool_in_spindle));
    events
}
