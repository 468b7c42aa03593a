use machinewatch_core::{ManualScheduler, PinDirection, PinError, PinSpec, PinType, PinValue};
use machinewatch_hal::{HalComponent, PinRegistry, SimHal, DEFAULT_PIN_INTERVAL};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

fn setup() -> (Arc<SimHal>, Arc<PinRegistry>, ManualScheduler, HalComponent) {
    let hal = Arc::new(SimHal::new());
    let timer = ManualScheduler::new();
    let registry = Arc::new(PinRegistry::new(
        Box::new(timer.clone()),
        DEFAULT_PIN_INTERVAL,
    ));
    let component = HalComponent::new(hal.clone(), "gui", registry.clone());
    (hal, registry, timer, component)
}

#[test]
fn test_new_pin_registers_and_starts_polling() {
    let (_hal, registry, timer, component) = setup();

    let pin = component
        .new_pin(PinSpec::new("jog-speed", PinType::Float, PinDirection::Out))
        .expect("pin");
    assert_eq!(pin.full_name(), "gui.jog-speed");
    assert!(registry.contains("gui.jog-speed"));
    assert!(registry.is_polling());
    assert!(timer.tick());
}

#[test]
fn test_duplicate_pin_is_creation_error_without_registration() {
    let (_hal, registry, _timer, component) = setup();
    component
        .new_pin(PinSpec::new("led", PinType::Bit, PinDirection::Out))
        .expect("pin");

    let err = component
        .new_pin(PinSpec::new("led", PinType::Bit, PinDirection::Out))
        .unwrap_err();
    assert!(matches!(err, PinError::Creation { .. }));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_get_pin_observes_existing_pin() {
    let (hal, registry, timer, component) = setup();
    component
        .new_pin(PinSpec::new("count", PinType::S32, PinDirection::In))
        .expect("pin");

    let again = component.get_pin("count").expect("lookup");
    assert_eq!(again.direction(), PinDirection::In);
    assert_eq!(registry.len(), 2);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    again.value_changed().connect(move |v| s.lock().push(*v));

    timer.tick();
    hal.drive("gui", "count", PinValue::S32(-4)).expect("drive");
    timer.tick();
    timer.tick();
    assert_eq!(*seen.lock(), vec![PinValue::S32(0), PinValue::S32(-4)]);

    assert!(matches!(
        component.get_pin("missing"),
        Err(PinError::Creation { .. })
    ));
}

#[test]
fn test_keyed_access_passes_through() {
    let (hal, _registry, _timer, component) = setup();
    component
        .new_pin(PinSpec::new("spindle-speed", PinType::Float, PinDirection::Out))
        .expect("pin");
    component
        .new_pin(PinSpec::new("estop", PinType::Bit, PinDirection::In))
        .expect("pin");

    component
        .set("spindle-speed", PinValue::Float(1200.0))
        .expect("set");
    assert_eq!(component.get("spindle-speed"), Ok(PinValue::Float(1200.0)));
    assert_eq!(
        hal.value("gui", "spindle-speed"),
        Some(PinValue::Float(1200.0))
    );

    assert!(matches!(
        component.set("estop", PinValue::Bit(true)),
        Err(PinError::InvalidValue { .. })
    ));
}

#[test]
fn test_exit_evicts_pins_on_next_pass() {
    let (_hal, registry, timer, component) = setup();
    let other = HalComponent::new(
        Arc::new(SimHal::new()),
        "other",
        registry.clone(),
    );
    component
        .new_pin(PinSpec::new("a", PinType::Bit, PinDirection::Out))
        .expect("pin");
    component
        .new_pin(PinSpec::new("b", PinType::Bit, PinDirection::Out))
        .expect("pin");
    let survivor = other
        .new_pin(PinSpec::new("c", PinType::Bit, PinDirection::Out))
        .expect("pin");
    assert!(timer.tick());

    component.exit().expect("exit");
    assert_eq!(registry.len(), 3);
    assert!(timer.tick());
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(&survivor.full_name()));
    assert!(component.exit().is_err());
}

proptest! {
    #[test]
    fn prop_one_notification_per_changed_poll(values in proptest::collection::vec(0u32..4, 1..40)) {
        let (hal, registry, _timer, component) = setup();
        let pin = component
            .new_pin(PinSpec::new("v", PinType::U32, PinDirection::In))
            .expect("pin");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        pin.value_changed().connect(move |v| s.lock().push(*v));

        let mut expected = Vec::new();
        let mut previous = None;
        for value in values {
            hal.drive("gui", "v", PinValue::U32(value)).expect("drive");
            registry.poll_pass();
            if previous != Some(value) {
                expected.push(PinValue::U32(value));
            }
            previous = Some(value);
        }
        prop_assert_eq!(seen.lock().clone(), expected);
    }
}
