use machinewatch::{
    FieldValue, ManualScheduler, PinDirection, PinSpec, PinType, PinValue, SimHal,
    SimStatusSource, StatusEvent, StatusField, StatusSnapshot, StatusSource, TaskState,
    WatchConfig, WatchContext,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn manual_context() -> (WatchContext, ManualScheduler, ManualScheduler) {
    let pin_timer = ManualScheduler::new();
    let status_timer = ManualScheduler::new();
    let context = WatchContext::with_schedulers(
        WatchConfig::default(),
        Box::new(pin_timer.clone()),
        Box::new(status_timer.clone()),
    );
    (context, pin_timer, status_timer)
}

fn sim_source() -> Box<dyn StatusSource> {
    Box::new(SimStatusSource::default())
}

#[test]
fn test_status_watcher_first_construction_wins() {
    let (context, _pins, _status) = manual_context();
    let first = context.status_watcher(sim_source);

    let calls = AtomicUsize::new(0);
    let second = context.status_watcher(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        sim_source()
    });
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(first.get(StatusField::JogRate), FieldValue::Float(15.0));
}

#[test]
fn test_status_timer_drives_cycles() {
    let (context, _pins, status_timer) = manual_context();
    let source = SimStatusSource::default();
    let handle = source.handle();
    let watcher = context.status_watcher(move || Box::new(source));

    let states = Arc::new(Mutex::new(Vec::new()));
    let s = states.clone();
    watcher.signals().state_on.connect(move |_| s.lock().push("on"));

    context.start().expect("start");
    assert!(context.is_running());
    assert_eq!(status_timer.interval(), Some(Duration::from_millis(100)));

    assert!(status_timer.tick());
    handle.update(|snapshot| snapshot.task_state = TaskState::On);
    assert!(status_timer.tick());
    assert_eq!(*states.lock(), vec!["on"]);
    assert_eq!(watcher.cycle_count(), 2);

    // Transport failures keep the timer alive
    handle.fail_next_polls(1);
    assert!(status_timer.tick());
    assert_eq!(watcher.cycle_count(), 2);

    context.stop();
    assert!(!context.is_running());
    assert!(!status_timer.tick());
}

#[test]
fn test_component_pins_polled_by_context() {
    let (context, pin_timer, _status) = manual_context();
    let hal = Arc::new(SimHal::new());
    let component = context.component(hal.clone(), "gui");

    let pin = component
        .new_pin(PinSpec::new("feed-hold", PinType::Bit, PinDirection::In))
        .expect("pin");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    pin.value_changed().connect(move |v| s.lock().push(*v));

    assert!(pin_timer.tick());
    hal.drive("gui", "feed-hold", PinValue::Bit(true)).expect("drive");
    assert!(pin_timer.tick());
    assert_eq!(*seen.lock(), vec![PinValue::Bit(false), PinValue::Bit(true)]);

    context.stop();
    assert!(!pin_timer.tick());

    context.start().expect("restart");
    assert!(pin_timer.tick());
}

#[test]
fn test_shutdown_forgets_everything() {
    let (context, _pin_timer, _status) = manual_context();
    let hal = Arc::new(SimHal::new());
    context
        .component(hal, "gui")
        .new_pin(PinSpec::new("led", PinType::Bit, PinDirection::Out))
        .expect("pin");
    let first = context.status_watcher(sim_source);
    context.start().expect("start");

    context.shutdown();
    assert!(!context.is_running());
    assert!(context.pins().is_empty());
    assert!(context.current_status_watcher().is_none());

    let fresh = context.status_watcher(sim_source);
    assert!(!Arc::ptr_eq(&first, &fresh));
}

#[tokio::test]
async fn test_tokio_timers_drive_watcher() {
    let mut config = WatchConfig::default();
    config.polling.status_interval_ms = 10;
    let context = WatchContext::new(config);

    let source = SimStatusSource::new(StatusSnapshot {
        motion_line: 3,
        ..Default::default()
    });
    let watcher = context.status_watcher(move || Box::new(source));
    let events = Arc::new(AtomicUsize::new(0));
    let e = events.clone();
    watcher.signals().any.connect(move |event| {
        if *event == StatusEvent::WidgetUpdate {
            e.fetch_add(1, Ordering::SeqCst);
        }
    });

    context.start().expect("start");
    let mut attempts = 0;
    while events.load(Ordering::SeqCst) < 2 && attempts < 100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        attempts += 1;
    }
    context.shutdown();

    assert!(events.load(Ordering::SeqCst) >= 2);
    assert_eq!(watcher.get(StatusField::Line), FieldValue::Int(3));
}

#[test]
fn test_tokio_context_needs_runtime() {
    let context = WatchContext::new(WatchConfig::default());
    assert!(context.start().is_err());
    assert!(!context.is_running());
}

#[test]
fn test_context_uses_loaded_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[polling]\nstatus_interval_ms = 250\npin_interval_ms = 40\n\n[jog]\ndefault_rate = 30.0\n",
    )
    .expect("write config");
    let config = WatchConfig::load_from_file(&path).expect("load config");

    let pin_timer = ManualScheduler::new();
    let status_timer = ManualScheduler::new();
    let context = WatchContext::with_schedulers(
        config,
        Box::new(pin_timer.clone()),
        Box::new(status_timer.clone()),
    );
    let watcher = context.status_watcher(sim_source);
    assert_eq!(watcher.jog_rate(), 30.0);

    context.start().expect("start");
    assert_eq!(status_timer.interval(), Some(Duration::from_millis(250)));
    context.shutdown();
}
