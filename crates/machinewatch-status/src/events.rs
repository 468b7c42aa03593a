//! Status notification catalogue.
//!
//! Every notification the status watcher can deliver is a [`StatusEvent`].
//! Widgets subscribe either to a typed channel on [`StatusSignals`] or to a
//! set of [`StatusChannel`]s through [`StatusSignals::subscribe`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use machinewatch_core::{FieldError, InterpState, Signal, SubscriptionId, TaskMode, TaskState};

/// One status notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusEvent {
    /// Heartbeat, once per completed cycle
    WidgetUpdate,
    StateEstop,
    StateEstopReset,
    StateOn,
    StateOff,
    /// Digits of the homed joints
    Homed(String),
    AllHomed,
    /// Digits of the configured joints not yet homed
    NotAllHomed(String),
    OverrideLimitsChanged(Vec<bool>),
    ModeManual,
    ModeAuto,
    ModeMdi,
    InterpRun,
    InterpIdle,
    InterpPaused,
    InterpReading,
    InterpWaiting,
    JogRateChanged(f64),
    ProgramPauseChanged(bool),
    OptionalStopChanged(bool),
    BlockDeleteChanged(bool),
    FileLoaded(String),
    ReloadDisplay,
    LineChanged(i32),
    ToolInSpindleChanged(i32),
    /// Spindle enabled flag and direction
    SpindleControlChanged(bool, i32),
    /// Units per minute
    CurrentFeedRate(f64),
    CurrentXRelPosition(f64),
    /// Percent
    SpindleOverrideChanged(f64),
    /// Percent
    FeedOverrideChanged(f64),
    /// Percent
    RapidOverrideChanged(f64),
    FeedHoldEnabledChanged(bool),
    ItimeMode(bool),
    FpmMode(bool),
    FprMode(bool),
    CssMode(bool),
    RpmMode(bool),
    RadiusMode(bool),
    DiameterMode(bool),
    MCodeChanged(String),
    GCodeChanged(String),
    MetricModeChanged(bool),
    UserSystemChanged(i32),
}

impl StatusEvent {
    /// The event named by a task state
    pub fn for_state(state: TaskState) -> Self {
        match state {
            TaskState::Estop => StatusEvent::StateEstop,
            TaskState::EstopReset => StatusEvent::StateEstopReset,
            TaskState::Off => StatusEvent::StateOff,
            TaskState::On => StatusEvent::StateOn,
        }
    }

    /// The event named by a task mode
    pub fn for_mode(mode: TaskMode) -> Self {
        match mode {
            TaskMode::Manual => StatusEvent::ModeManual,
            TaskMode::Auto => StatusEvent::ModeAuto,
            TaskMode::Mdi => StatusEvent::ModeMdi,
        }
    }

    /// The event named by an interpreter state
    pub fn for_interp(interp: InterpState) -> Self {
        match interp {
            InterpState::Idle => StatusEvent::InterpIdle,
            InterpState::Reading => StatusEvent::InterpReading,
            InterpState::Paused => StatusEvent::InterpPaused,
            InterpState::Waiting => StatusEvent::InterpWaiting,
        }
    }

    /// The channel this event is delivered on
    pub fn channel(&self) -> StatusChannel {
        match self {
            StatusEvent::WidgetUpdate => StatusChannel::WidgetUpdate,
            StatusEvent::StateEstop => StatusChannel::StateEstop,
            StatusEvent::StateEstopReset => StatusChannel::StateEstopReset,
            StatusEvent::StateOn => StatusChannel::StateOn,
            StatusEvent::StateOff => StatusChannel::StateOff,
            StatusEvent::Homed(_) => StatusChannel::Homed,
            StatusEvent::AllHomed => StatusChannel::AllHomed,
            StatusEvent::NotAllHomed(_) => StatusChannel::NotAllHomed,
            StatusEvent::OverrideLimitsChanged(_) => StatusChannel::OverrideLimitsChanged,
            StatusEvent::ModeManual => StatusChannel::ModeManual,
            StatusEvent::ModeAuto => StatusChannel::ModeAuto,
            StatusEvent::ModeMdi => StatusChannel::ModeMdi,
            StatusEvent::InterpRun => StatusChannel::InterpRun,
            StatusEvent::InterpIdle => StatusChannel::InterpIdle,
            StatusEvent::InterpPaused => StatusChannel::InterpPaused,
            StatusEvent::InterpReading => StatusChannel::InterpReading,
            StatusEvent::InterpWaiting => StatusChannel::InterpWaiting,
            StatusEvent::JogRateChanged(_) => StatusChannel::JogRateChanged,
            StatusEvent::ProgramPauseChanged(_) => StatusChannel::ProgramPauseChanged,
            StatusEvent::OptionalStopChanged(_) => StatusChannel::OptionalStopChanged,
            StatusEvent::BlockDeleteChanged(_) => StatusChannel::BlockDeleteChanged,
            StatusEvent::FileLoaded(_) => StatusChannel::FileLoaded,
            StatusEvent::ReloadDisplay => StatusChannel::ReloadDisplay,
            StatusEvent::LineChanged(_) => StatusChannel::LineChanged,
            StatusEvent::ToolInSpindleChanged(_) => StatusChannel::ToolInSpindleChanged,
            StatusEvent::SpindleControlChanged(..) => StatusChannel::SpindleControlChanged,
            StatusEvent::CurrentFeedRate(_) => StatusChannel::CurrentFeedRate,
            StatusEvent::CurrentXRelPosition(_) => StatusChannel::CurrentXRelPosition,
            StatusEvent::SpindleOverrideChanged(_) => StatusChannel::SpindleOverrideChanged,
            StatusEvent::FeedOverrideChanged(_) => StatusChannel::FeedOverrideChanged,
            StatusEvent::RapidOverrideChanged(_) => StatusChannel::RapidOverrideChanged,
            StatusEvent::FeedHoldEnabledChanged(_) => StatusChannel::FeedHoldEnabledChanged,
            StatusEvent::ItimeMode(_) => StatusChannel::ItimeMode,
            StatusEvent::FpmMode(_) => StatusChannel::FpmMode,
            StatusEvent::FprMode(_) => StatusChannel::FprMode,
            StatusEvent::CssMode(_) => StatusChannel::CssMode,
            StatusEvent::RpmMode(_) => StatusChannel::RpmMode,
            StatusEvent::RadiusMode(_) => StatusChannel::RadiusMode,
            StatusEvent::DiameterMode(_) => StatusChannel::DiameterMode,
            StatusEvent::MCodeChanged(_) => StatusChannel::MCodeChanged,
            StatusEvent::GCodeChanged(_) => StatusChannel::GCodeChanged,
            StatusEvent::MetricModeChanged(_) => StatusChannel::MetricModeChanged,
            StatusEvent::UserSystemChanged(_) => StatusChannel::UserSystemChanged,
        }
    }

    /// Check if this event fires every cycle whether or not anything changed
    pub fn is_unconditional(&self) -> bool {
        matches!(
            self,
            StatusEvent::WidgetUpdate
                | StatusEvent::CurrentFeedRate(_)
                | StatusEvent::CurrentXRelPosition(_)
        )
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.channel())
    }
}

/// Name of a status notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusChannel {
    WidgetUpdate,
    StateEstop,
    StateEstopReset,
    StateOn,
    StateOff,
    Homed,
    AllHomed,
    NotAllHomed,
    OverrideLimitsChanged,
    ModeManual,
    ModeAuto,
    ModeMdi,
    InterpRun,
    InterpIdle,
    InterpPaused,
    InterpReading,
    InterpWaiting,
    JogRateChanged,
    ProgramPauseChanged,
    OptionalStopChanged,
    BlockDeleteChanged,
    FileLoaded,
    ReloadDisplay,
    LineChanged,
    ToolInSpindleChanged,
    SpindleControlChanged,
    CurrentFeedRate,
    CurrentXRelPosition,
    SpindleOverrideChanged,
    FeedOverrideChanged,
    RapidOverrideChanged,
    FeedHoldEnabledChanged,
    ItimeMode,
    FpmMode,
    FprMode,
    CssMode,
    RpmMode,
    RadiusMode,
    DiameterMode,
    MCodeChanged,
    GCodeChanged,
    MetricModeChanged,
    UserSystemChanged,
}

impl StatusChannel {
    /// Every channel in the catalogue
    pub const ALL: [StatusChannel; 43] = [
        StatusChannel::WidgetUpdate,
        StatusChannel::StateEstop,
        StatusChannel::StateEstopReset,
        StatusChannel::StateOn,
        StatusChannel::StateOff,
        StatusChannel::Homed,
        StatusChannel::AllHomed,
        StatusChannel::NotAllHomed,
        StatusChannel::OverrideLimitsChanged,
        StatusChannel::ModeManual,
        StatusChannel::ModeAuto,
        StatusChannel::ModeMdi,
        StatusChannel::InterpRun,
        StatusChannel::InterpIdle,
        StatusChannel::InterpPaused,
        StatusChannel::InterpReading,
        StatusChannel::InterpWaiting,
        StatusChannel::JogRateChanged,
        StatusChannel::ProgramPauseChanged,
        StatusChannel::OptionalStopChanged,
        StatusChannel::BlockDeleteChanged,
        StatusChannel::FileLoaded,
        StatusChannel::ReloadDisplay,
        StatusChannel::LineChanged,
        StatusChannel::ToolInSpindleChanged,
        StatusChannel::SpindleControlChanged,
        StatusChannel::CurrentFeedRate,
        StatusChannel::CurrentXRelPosition,
        StatusChannel::SpindleOverrideChanged,
        StatusChannel::FeedOverrideChanged,
        StatusChannel::RapidOverrideChanged,
        StatusChannel::FeedHoldEnabledChanged,
        StatusChannel::ItimeMode,
        StatusChannel::FpmMode,
        StatusChannel::FprMode,
        StatusChannel::CssMode,
        StatusChannel::RpmMode,
        StatusChannel::RadiusMode,
        StatusChannel::DiameterMode,
        StatusChannel::MCodeChanged,
        StatusChannel::GCodeChanged,
        StatusChannel::MetricModeChanged,
        StatusChannel::UserSystemChanged,
    ];

    /// Channel name as widgets refer to it
    pub fn name(&self) -> &'static str {
        match self {
            StatusChannel::WidgetUpdate => "update",
            StatusChannel::StateEstop => "state_estop",
            StatusChannel::StateEstopReset => "state_estop_reset",
            StatusChannel::StateOn => "state_on",
            StatusChannel::StateOff => "state_off",
            StatusChannel::Homed => "homed",
            StatusChannel::AllHomed => "all_homed",
            StatusChannel::NotAllHomed => "not_all_homed",
            StatusChannel::OverrideLimitsChanged => "override_limits_changed",
            StatusChannel::ModeManual => "mode_manual",
            StatusChannel::ModeAuto => "mode_auto",
            StatusChannel::ModeMdi => "mode_mdi",
            StatusChannel::InterpRun => "interp_run",
            StatusChannel::InterpIdle => "interp_idle",
            StatusChannel::InterpPaused => "interp_paused",
            StatusChannel::InterpReading => "interp_reading",
            StatusChannel::InterpWaiting => "interp_waiting",
            StatusChannel::JogRateChanged => "jograte_changed",
            StatusChannel::ProgramPauseChanged => "program_pause_changed",
            StatusChannel::OptionalStopChanged => "optional_stop_changed",
            StatusChannel::BlockDeleteChanged => "block_delete_changed",
            StatusChannel::FileLoaded => "file_loaded",
            StatusChannel::ReloadDisplay => "reload_display",
            StatusChannel::LineChanged => "line_changed",
            StatusChannel::ToolInSpindleChanged => "tool_in_spindle_changed",
            StatusChannel::SpindleControlChanged => "spindle_control_changed",
            StatusChannel::CurrentFeedRate => "current_feed_rate",
            StatusChannel::CurrentXRelPosition => "current_x_rel_position",
            StatusChannel::SpindleOverrideChanged => "spindle_override_changed",
            StatusChannel::FeedOverrideChanged => "feed_override_changed",
            StatusChannel::RapidOverrideChanged => "rapid_override_changed",
            StatusChannel::FeedHoldEnabledChanged => "feed_hold_enabled_changed",
            StatusChannel::ItimeMode => "itime_mode",
            StatusChannel::FpmMode => "fpm_mode",
            StatusChannel::FprMode => "fpr_mode",
            StatusChannel::CssMode => "css_mode",
            StatusChannel::RpmMode => "rpm_mode",
            StatusChannel::RadiusMode => "radius_mode",
            StatusChannel::DiameterMode => "diameter_mode",
            StatusChannel::MCodeChanged => "m_code_changed",
            StatusChannel::GCodeChanged => "g_code_changed",
            StatusChannel::MetricModeChanged => "metric_mode_changed",
            StatusChannel::UserSystemChanged => "user_system_changed",
        }
    }
}

impl fmt::Display for StatusChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StatusChannel {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusChannel::ALL
            .iter()
            .copied()
            .find(|channel| channel.name() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// Which channels a catch-all subscriber receives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChannelFilter {
    /// Every event
    #[default]
    All,
    /// Only events on the listed channels
    Channels(Vec<StatusChannel>),
}

impl ChannelFilter {
    /// Check if an event passes the filter
    pub fn matches(&self, event: &StatusEvent) -> bool {
        match self {
            ChannelFilter::All => true,
            ChannelFilter::Channels(channels) => channels.contains(&event.channel()),
        }
    }
}

/// Typed notification channels for one status watcher
///
/// Each event is delivered first to its typed channel and then to the
/// catch-all `any` channel.
pub struct StatusSignals {
    pub widget_update: Signal<()>,
    pub state_estop: Signal<()>,
    pub state_estop_reset: Signal<()>,
    pub state_on: Signal<()>,
    pub state_off: Signal<()>,
    pub homed: Signal<String>,
    pub all_homed: Signal<()>,
    pub not_all_homed: Signal<String>,
    pub override_limits_changed: Signal<Vec<bool>>,
    pub mode_manual: Signal<()>,
    pub mode_auto: Signal<()>,
    pub mode_mdi: Signal<()>,
    pub interp_run: Signal<()>,
    pub interp_idle: Signal<()>,
    pub interp_paused: Signal<()>,
    pub interp_reading: Signal<()>,
    pub interp_waiting: Signal<()>,
    pub jograte_changed: Signal<f64>,
    pub program_pause_changed: Signal<bool>,
    pub optional_stop_changed: Signal<bool>,
    pub block_delete_changed: Signal<bool>,
    pub file_loaded: Signal<String>,
    pub reload_display: Signal<()>,
    pub line_changed: Signal<i32>,
    pub tool_in_spindle_changed: Signal<i32>,
    /// `(enabled, direction)`
    pub spindle_control_changed: Signal<(bool, i32)>,
    pub current_feed_rate: Signal<f64>,
    pub current_x_rel_position: Signal<f64>,
    pub spindle_override_changed: Signal<f64>,
    pub feed_override_changed: Signal<f64>,
    pub rapid_override_changed: Signal<f64>,
    pub feed_hold_enabled_changed: Signal<bool>,
    pub itime_mode: Signal<bool>,
    pub fpm_mode: Signal<bool>,
    pub fpr_mode: Signal<bool>,
    pub css_mode: Signal<bool>,
    pub rpm_mode: Signal<bool>,
    pub radius_mode: Signal<bool>,
    pub diameter_mode: Signal<bool>,
    pub m_code_changed: Signal<String>,
    pub g_code_changed: Signal<String>,
    pub metric_mode_changed: Signal<bool>,
    pub user_system_changed: Signal<i32>,
    /// Every event, after its typed channel
    pub any: Signal<StatusEvent>,
}

impl StatusSignals {
    /// Create a catalogue with no subscribers
    pub fn new() -> Self {
        Self {
            widget_update: Signal::new("update"),
            state_estop: Signal::new("state_estop"),
            state_estop_reset: Signal::new("state_estop_reset"),
            state_on: Signal::new("state_on"),
            state_off: Signal::new("state_off"),
            homed: Signal::new("homed"),
            all_homed: Signal::new("all_homed"),
            not_all_homed: Signal::new("not_all_homed"),
            override_limits_changed: Signal::new("override_limits_changed"),
            mode_manual: Signal::new("mode_manual"),
            mode_auto: Signal::new("mode_auto"),
            mode_mdi: Signal::new("mode_mdi"),
            interp_run: Signal::new("interp_run"),
            interp_idle: Signal::new("interp_idle"),
            interp_paused: Signal::new("interp_paused"),
            interp_reading: Signal::new("interp_reading"),
            interp_waiting: Signal::new("interp_waiting"),
            jograte_changed: Signal::new("jograte_changed"),
            program_pause_changed: Signal::new("program_pause_changed"),
            optional_stop_changed: Signal::new("optional_stop_changed"),
            block_delete_changed: Signal::new("block_delete_changed"),
            file_loaded: Signal::new("file_loaded"),
            reload_display: Signal::new("reload_display"),
            line_changed: Signal::new("line_changed"),
            tool_in_spindle_changed: Signal::new("tool_in_spindle_changed"),
            spindle_control_changed: Signal::new("spindle_control_changed"),
            current_feed_rate: Signal::new("current_feed_rate"),
            current_x_rel_position: Signal::new("current_x_rel_position"),
            spindle_override_changed: Signal::new("spindle_override_changed"),
            feed_override_changed: Signal::new("feed_override_changed"),
            rapid_override_changed: Signal::new("rapid_override_changed"),
            feed_hold_enabled_changed: Signal::new("feed_hold_enabled_changed"),
            itime_mode: Signal::new("itime_mode"),
            fpm_mode: Signal::new("fpm_mode"),
            fpr_mode: Signal::new("fpr_mode"),
            css_mode: Signal::new("css_mode"),
            rpm_mode: Signal::new("rpm_mode"),
            radius_mode: Signal::new("radius_mode"),
            diameter_mode: Signal::new("diameter_mode"),
            m_code_changed: Signal::new("m_code_changed"),
            g_code_changed: Signal::new("g_code_changed"),
            metric_mode_changed: Signal::new("metric_mode_changed"),
            user_system_changed: Signal::new("user_system_changed"),
            any: Signal::new("any"),
        }
    }

    /// Subscribe to every event passing `filter`
    pub fn subscribe<F>(&self, filter: ChannelFilter, slot: F) -> SubscriptionId
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static,
    {
        self.any.connect(move |event| {
            if filter.matches(event) {
                slot(event);
            }
        })
    }

    /// Remove a catch-all subscription
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.any.disconnect(id)
    }

    /// Deliver one event to its typed channel, then to `any`
    pub fn dispatch(&self, event: &StatusEvent) {
        match event {
            StatusEvent::WidgetUpdate => self.widget_update.notify(),
            StatusEvent::StateEstop => self.state_estop.notify(),
            StatusEvent::StateEstopReset => self.state_estop_reset.notify(),
            StatusEvent::StateOn => self.state_on.notify(),
            StatusEvent::StateOff => self.state_off.notify(),
            StatusEvent::Homed(joints) => self.homed.emit(joints),
            StatusEvent::AllHomed => self.all_homed.notify(),
            StatusEvent::NotAllHomed(joints) => self.not_all_homed.emit(joints),
            StatusEvent::OverrideLimitsChanged(flags) => self.override_limits_changed.emit(flags),
            StatusEvent::ModeManual => self.mode_manual.notify(),
            StatusEvent::ModeAuto => self.mode_auto.notify(),
            StatusEvent::ModeMdi => self.mode_mdi.notify(),
            StatusEvent::InterpRun => self.interp_run.notify(),
            StatusEvent::InterpIdle => self.interp_idle.notify(),
            StatusEvent::InterpPaused => self.interp_paused.notify(),
            StatusEvent::InterpReading => self.interp_reading.notify(),
            StatusEvent::InterpWaiting => self.interp_waiting.notify(),
            StatusEvent::JogRateChanged(rate) => self.jograte_changed.emit(rate),
            StatusEvent::ProgramPauseChanged(v) => self.program_pause_changed.emit(v),
            StatusEvent::OptionalStopChanged(v) => self.optional_stop_changed.emit(v),
            StatusEvent::BlockDeleteChanged(v) => self.block_delete_changed.emit(v),
            StatusEvent::FileLoaded(path) => self.file_loaded.emit(path),
            StatusEvent::ReloadDisplay => self.reload_display.notify(),
            StatusEvent::LineChanged(line) => self.line_changed.emit(line),
            StatusEvent::ToolInSpindleChanged(tool) => self.tool_in_spindle_changed.emit(tool),
            StatusEvent::SpindleControlChanged(enabled, direction) => {
                self.spindle_control_changed.emit(&(*enabled, *direction))
            }
            StatusEvent::CurrentFeedRate(v) => self.current_feed_rate.emit(v),
            StatusEvent::CurrentXRelPosition(v) => self.current_x_rel_position.emit(v),
            StatusEvent::SpindleOverrideChanged(v) => self.spindle_override_changed.emit(v),
            StatusEvent::FeedOverrideChanged(v) => self.feed_override_changed.emit(v),
            StatusEvent::RapidOverrideChanged(v) => self.rapid_override_changed.emit(v),
            StatusEvent::FeedHoldEnabledChanged(v) => self.feed_hold_enabled_changed.emit(v),
            StatusEvent::ItimeMode(v) => self.itime_mode.emit(v),
            StatusEvent::FpmMode(v) => self.fpm_mode.emit(v),
            StatusEvent::FprMode(v) => self.fpr_mode.emit(v),
            StatusEvent::CssMode(v) => self.css_mode.emit(v),
            StatusEvent::RpmMode(v) => self.rpm_mode.emit(v),
            StatusEvent::RadiusMode(v) => self.radius_mode.emit(v),
            StatusEvent::DiameterMode(v) => self.diameter_mode.emit(v),
            StatusEvent::MCodeChanged(codes) => self.m_code_changed.emit(codes),
            StatusEvent::GCodeChanged(codes) => self.g_code_changed.emit(codes),
            StatusEvent::MetricModeChanged(v) => self.metric_mode_changed.emit(v),
            StatusEvent::UserSystemChanged(index) => self.user_system_changed.emit(index),
        }
        self.any.emit(event);
    }
}

impl Default for StatusSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatusSignals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusSignals")
            .field("any", &self.any.slot_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_channel_names_unique_and_parse() {
        let names: HashSet<_> = StatusChannel::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), StatusChannel::ALL.len());
        for channel in StatusChannel::ALL {
            assert_eq!(channel.name().parse::<StatusChannel>(), Ok(channel));
        }
        assert!("nonsense".parse::<StatusChannel>().is_err());
    }

    #[test]
    fn test_named_events() {
        assert_eq!(StatusEvent::for_state(TaskState::On), StatusEvent::StateOn);
        assert_eq!(StatusEvent::for_mode(TaskMode::Mdi), StatusEvent::ModeMdi);
        assert_eq!(
            StatusEvent::for_interp(InterpState::Waiting),
            StatusEvent::InterpWaiting
        );
        assert_eq!(StatusEvent::LineChanged(3).to_string(), "line_changed");
    }

    #[test]
    fn test_dispatch_typed_then_any() {
        let signals = StatusSignals::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = order.clone();
        signals.line_changed.connect(move |line| o.lock().push(format!("line {}", line)));
        let o = order.clone();
        signals.any.connect(move |event| o.lock().push(format!("any {}", event)));

        signals.dispatch(&StatusEvent::LineChanged(42));
        assert_eq!(
            *order.lock(),
            vec!["line 42".to_string(), "any line_changed".to_string()]
        );
    }

    #[test]
    fn test_spindle_control_payload() {
        let signals = StatusSignals::new();
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        signals
            .spindle_control_changed
            .connect(move |payload| *s.lock() = Some(*payload));

        signals.dispatch(&StatusEvent::SpindleControlChanged(true, -1));
        assert_eq!(*seen.lock(), Some((true, -1)));
    }

    #[test]
    fn test_filtered_subscription() {
        let signals = StatusSignals::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let id = signals.subscribe(
            ChannelFilter::Channels(vec![StatusChannel::StateOn, StatusChannel::StateOff]),
            move |event| s.lock().push(event.clone()),
        );

        signals.dispatch(&StatusEvent::StateOn);
        signals.dispatch(&StatusEvent::WidgetUpdate);
        signals.dispatch(&StatusEvent::StateOff);
        assert_eq!(
            *seen.lock(),
            vec![StatusEvent::StateOn, StatusEvent::StateOff]
        );

        assert!(signals.unsubscribe(id));
        signals.dispatch(&StatusEvent::StateOn);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_events_serialize_by_variant() {
        assert_eq!(
            serde_json::to_string(&StatusEvent::WidgetUpdate).expect("serialize"),
            "\"WidgetUpdate\""
        );
        assert_eq!(
            serde_json::to_string(&StatusEvent::SpindleControlChanged(true, -1)).expect("serialize"),
            "{\"SpindleControlChanged\":[true,-1]}"
        );
        let event: StatusEvent =
            serde_json::from_str("{\"FileLoaded\":\"/progs/a.ngc\"}").expect("deserialize");
        assert_eq!(event, StatusEvent::FileLoaded("/progs/a.ngc".to_string()));
    }
}
