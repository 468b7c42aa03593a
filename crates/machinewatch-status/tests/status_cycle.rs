use machinewatch_core::{InterpState, StatusSnapshot, TaskMode, TaskState};
use machinewatch_status::{
    CycleOutcome, HomingSummary, SimStatusHandle, SimStatusSource, StatusEvent, StatusWatcher,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

struct Harness {
    watcher: StatusWatcher,
    handle: SimStatusHandle,
    seen: Arc<Mutex<Vec<StatusEvent>>>,
}

impl Harness {
    fn new(initial: StatusSnapshot) -> Self {
        let source = SimStatusSource::new(initial);
        let handle = source.handle();
        let watcher = StatusWatcher::new(Box::new(source));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        watcher.signals().any.connect(move |e| s.lock().push(e.clone()));
        Self {
            watcher,
            handle,
            seen,
        }
    }

    fn take(&self) -> Vec<StatusEvent> {
        std::mem::take(&mut *self.seen.lock())
    }

    /// Run a cycle and return the events that are not sent every cycle
    fn cycle(&self) -> Vec<StatusEvent> {
        self.take();
        self.watcher.update();
        self.take()
            .into_iter()
            .filter(|e| !e.is_unconditional())
            .collect()
    }
}

#[test]
fn test_unchanged_cycle_emits_only_unconditional_events() {
    let h = Harness::new(StatusSnapshot {
        current_vel: 2.0,
        actual_position: [10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        g5x_offset: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        tool_offset: [0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        g92_offset: [2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ..Default::default()
    });
    h.watcher.update();
    h.take();

    assert_eq!(h.watcher.update(), CycleOutcome::Completed { events: 3 });
    assert_eq!(
        h.take(),
        vec![
            StatusEvent::CurrentFeedRate(120.0),
            StatusEvent::CurrentXRelPosition(6.5),
            StatusEvent::WidgetUpdate,
        ]
    );
}

type Mutation = fn(&mut StatusSnapshot);

fn case(mutate: Mutation, expected: StatusEvent) -> (Mutation, StatusEvent) {
    (mutate, expected)
}

#[test]
fn test_single_field_change_emits_single_event() {
    let cases = vec![
        case(|s| s.paused = true, StatusEvent::ProgramPauseChanged(true)),
        case(|s| s.block_delete = true, StatusEvent::BlockDeleteChanged(true)),
        case(|s| s.optional_stop = true, StatusEvent::OptionalStopChanged(true)),
        case(|s| s.motion_line = 5, StatusEvent::LineChanged(5)),
        case(|s| s.tool_in_spindle = 3, StatusEvent::ToolInSpindleChanged(3)),
        case(|s| s.spindle_enabled = true, StatusEvent::SpindleControlChanged(true, 0)),
        case(|s| s.spindle_direction = -1, StatusEvent::SpindleControlChanged(false, -1)),
        case(|s| s.spindle_rate = 0.5, StatusEvent::SpindleOverrideChanged(50.0)),
        case(|s| s.rapid_rate = 0.25, StatusEvent::RapidOverrideChanged(25.0)),
        case(|s| s.feed_hold_enabled = false, StatusEvent::FeedHoldEnabledChanged(false)),
        case(|s| s.g5x_index = 2, StatusEvent::UserSystemChanged(2)),
        case(|s| s.mcodes = vec![0, 3], StatusEvent::MCodeChanged("M3 ".to_string())),
        case(|s| s.gcodes = vec![0, 170], StatusEvent::GCodeChanged("G17 ".to_string())),
        case(|s| s.task_mode = TaskMode::Auto, StatusEvent::ModeAuto),
        case(
            |s| s.file = "/progs/a.ngc".to_string(),
            StatusEvent::FileLoaded("/progs/a.ngc".to_string()),
        ),
    ];

    for (mutate, expected) in cases {
        let h = Harness::new(StatusSnapshot::default());
        h.cycle();
        h.handle.update(mutate);
        assert_eq!(h.cycle(), vec![expected]);
    }
}

#[test]
fn test_first_cycle_triad_regardless_of_state() {
    for state in [TaskState::Estop, TaskState::EstopReset, TaskState::Off, TaskState::On] {
        let h = Harness::new(StatusSnapshot {
            task_state: state,
            interp_state: InterpState::Reading,
            ..Default::default()
        });
        let events = h.cycle();
        let first = if state == TaskState::Estop {
            StatusEvent::StateEstop
        } else {
            StatusEvent::StateEstopReset
        };
        assert_eq!(
            &events[..3],
            &[first, StatusEvent::StateOff, StatusEvent::InterpIdle]
        );
    }
}

#[test]
fn test_gcode_decode_example() {
    let h = Harness::new(StatusSnapshot {
        gcodes: vec![-1, 10, 71, 210],
        ..Default::default()
    });
    let events = h.cycle();
    assert!(events.contains(&StatusEvent::GCodeChanged("G1 G7.1 G21 ".to_string())));
    assert!(events.contains(&StatusEvent::DiameterMode(true)));
    assert!(events.contains(&StatusEvent::MetricModeChanged(true)));
    assert!(events.contains(&StatusEvent::RadiusMode(false)));
}

#[test]
fn test_file_change_suppressed_unless_idle() {
    let h = Harness::new(StatusSnapshot {
        file: "/progs/part.ngc".to_string(),
        ..Default::default()
    });
    h.cycle();

    // Remap running at call level 1: the file field is not followed at all
    h.handle.update(|s| {
        s.call_level = 1;
        s.file = "/remap/m6.ngc".to_string();
    });
    assert!(h.cycle().is_empty());

    // Top level but running: recorded without a notification
    h.handle.update(|s| {
        s.call_level = 0;
        s.file = "/progs/other.ngc".to_string();
        s.interp_state = InterpState::Reading;
    });
    let events = h.cycle();
    assert_eq!(events, vec![StatusEvent::InterpRun, StatusEvent::InterpReading]);

    h.handle.update(|s| s.interp_state = InterpState::Idle);
    assert_eq!(h.cycle(), vec![StatusEvent::InterpIdle]);
    assert_eq!(
        h.watcher.derived().map(|d| d.file),
        Some("/progs/other.ngc".to_string())
    );

    h.handle.update(|s| s.file = "/progs/third.ngc".to_string());
    assert_eq!(
        h.cycle(),
        vec![StatusEvent::FileLoaded("/progs/third.ngc".to_string())]
    );
}

#[test]
fn test_forced_refresh_mode_asymmetry() {
    let h = Harness::new(StatusSnapshot::default());
    h.cycle();

    h.watcher.force_refresh();
    let forced = h.take();
    assert!(!forced.iter().any(|e| matches!(e, StatusEvent::CssMode(_))));
    assert!(forced.contains(&StatusEvent::JogRateChanged(15.0)));
    assert!(forced.contains(&StatusEvent::UserSystemChanged(1)));

    h.handle.update(|s| s.gcodes = vec![0, 960]);
    let events = h.cycle();
    assert!(events.contains(&StatusEvent::CssMode(true)));

    h.handle.update(|s| s.gcodes = vec![0, 970]);
    let events = h.cycle();
    assert!(events.contains(&StatusEvent::CssMode(false)));
    assert!(events.contains(&StatusEvent::RpmMode(true)));
}

#[test]
fn test_forced_refresh_recorded_for_next_diff() {
    let h = Harness::new(StatusSnapshot::default());
    h.cycle();
    h.handle.update(|s| s.motion_line = 40);

    h.watcher.force_refresh();
    h.take();
    assert!(h.cycle().is_empty());
}

#[test]
fn test_reload_display_on_request() {
    let h = Harness::new(StatusSnapshot::default());
    let reloads = Arc::new(Mutex::new(0));
    let r = reloads.clone();
    h.watcher.signals().reload_display.connect(move |_| *r.lock() += 1);

    h.watcher.request_reload_display();
    assert_eq!(*reloads.lock(), 1);
    assert_eq!(h.take(), vec![StatusEvent::ReloadDisplay]);
}

proptest! {
    #[test]
    fn prop_all_homed_iff_masked_axes_homed(
        homed in proptest::collection::vec(any::<bool>(), 9),
        mask in 0u32..512,
    ) {
        let h = Harness::new(StatusSnapshot {
            homed: homed.clone(),
            axis_mask: mask,
            ..Default::default()
        });
        let events = h.cycle();

        let masked_homed = (0..9).filter(|&j| mask & (1 << j) != 0 && homed[j]).count() as u32;
        let expect_all = masked_homed == mask.count_ones();
        prop_assert_eq!(events.contains(&StatusEvent::AllHomed), expect_all);

        let unhomed: String = (0..9)
            .filter(|&j| mask & (1 << j) != 0 && !homed[j])
            .map(|j| j.to_string())
            .collect();
        let not_all = events.iter().find_map(|e| match e {
            StatusEvent::NotAllHomed(joints) => Some(joints.clone()),
            _ => None,
        });
        if expect_all {
            prop_assert_eq!(not_all, None);
        } else {
            prop_assert_eq!(not_all, Some(unhomed));
        }
    }

    #[test]
    fn prop_configured_joints_past_homed_flags_count_as_unhomed(
        homed in proptest::collection::vec(any::<bool>(), 0..5),
        mask in 1u32..512,
    ) {
        let summary = HomingSummary::compute(&homed, mask);
        let flag = |j: usize| homed.get(j).copied().unwrap_or(false);

        prop_assert_eq!(summary.axis_count, mask.count_ones());
        let masked_homed = (0..9).filter(|&j| mask & (1 << j) != 0 && flag(j)).count() as u32;
        prop_assert_eq!(summary.all_homed(), masked_homed == mask.count_ones());

        let unhomed: String = (0..9)
            .filter(|&j| mask & (1 << j) != 0 && !flag(j))
            .map(|j| j.to_string())
            .collect();
        prop_assert_eq!(summary.unhomed, unhomed);
    }

    #[test]
    fn prop_gcode_string_lists_active_codes_ascending(
        codes in proptest::collection::vec(prop_oneof![Just(-1i32), 0i32..1000], 0..10),
    ) {
        let mut raw = vec![7];
        raw.extend(codes.iter().copied());
        let rendered = machinewatch_status::format_gcodes(&raw);

        let mut active: Vec<i32> = codes.into_iter().filter(|&c| c != -1).collect();
        active.sort_unstable();

        prop_assert!(rendered.is_empty() || rendered.ends_with(' '));
        let parsed: Vec<i32> = rendered
            .split_whitespace()
            .map(|token| {
                let number = token.trim_start_matches('G');
                match number.split_once('.') {
                    Some((whole, tenth)) => whole.parse::<i32>().unwrap() * 10 + tenth.parse::<i32>().unwrap(),
                    None => number.parse::<i32>().unwrap() * 10,
                }
            })
            .collect();
        prop_assert_eq!(parsed, active);
    }
}
