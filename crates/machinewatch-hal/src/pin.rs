//! Observed HAL pin.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use machinewatch_core::{
    HalError, PinDirection, PinError, PinHandle, PinType, PinValue, Signal,
};

use crate::layer::{is_stale, HalLayer};

/// A HAL pin plus the value seen on the previous poll
///
/// `value_changed` fires once per poll in which the value differs from the
/// previous poll's value (exact equality, including for floats). The first
/// poll always fires with the initial value.
pub struct WatchedPin {
    handle: PinHandle,
    layer: Arc<dyn HalLayer>,
    previous: Mutex<Option<PinValue>>,
    value_changed: Signal<PinValue>,
}

impl WatchedPin {
    /// Wrap a HAL handle for observation
    pub fn new(layer: Arc<dyn HalLayer>, handle: PinHandle) -> Self {
        Self {
            handle,
            layer,
            previous: Mutex::new(None),
            value_changed: Signal::new("value_changed"),
        }
    }

    /// Pin name within its component
    pub fn name(&self) -> &str {
        &self.handle.name
    }

    /// Fully qualified `component.pin` name
    pub fn full_name(&self) -> String {
        self.handle.full_name()
    }

    /// Value type
    pub fn pin_type(&self) -> PinType {
        self.handle.pin_type
    }

    /// Data direction
    pub fn direction(&self) -> PinDirection {
        self.handle.direction
    }

    /// Underlying HAL handle
    pub fn handle(&self) -> &PinHandle {
        &self.handle
    }

    /// Notification fired when the polled value changes
    pub fn value_changed(&self) -> &Signal<PinValue> {
        &self.value_changed
    }

    /// Value cached by the last successful poll
    pub fn last_value(&self) -> Option<PinValue> {
        *self.previous.lock()
    }

    /// Read the current value straight from the HAL
    pub fn read(&self) -> Result<PinValue, PinError> {
        self.layer
            .read(&self.handle)
            .map_err(|e| self.classify(e))
    }

    /// Write a new value straight to the HAL
    pub fn write(&self, value: PinValue) -> Result<(), PinError> {
        if !self.handle.direction.is_writable() {
            return Err(PinError::InvalidValue {
                pin: self.full_name(),
                reason: "pin is input-only".to_string(),
            });
        }
        if value.pin_type() != self.handle.pin_type {
            return Err(PinError::InvalidValue {
                pin: self.full_name(),
                reason: format!(
                    "expected a {} value, got {}",
                    self.handle.pin_type,
                    value.pin_type()
                ),
            });
        }
        self.layer
            .write(&self.handle, value)
            .map_err(|e| self.classify(e))
    }

    /// Poll once, returning the new value if it changed
    ///
    /// Does not emit; the registry delivers notifications once the whole pass
    /// has finished.
    pub fn poll_once(&self) -> Result<Option<PinValue>, PinError> {
        let current = self.read()?;
        let mut previous = self.previous.lock();
        if previous.as_ref() == Some(&current) {
            return Ok(None);
        }
        *previous = Some(current);
        Ok(Some(current))
    }

    /// Poll once and emit `value_changed` on change
    pub fn update(&self) -> Result<bool, PinError> {
        match self.poll_once()? {
            Some(value) => {
                self.value_changed.emit(&value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn classify(&self, error: HalError) -> PinError {
        if is_stale(&error) {
            PinError::Stale {
                pin: self.full_name(),
                source: error,
            }
        } else {
            PinError::Hal(error)
        }
    }
}

impl fmt::Debug for WatchedPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchedPin")
            .field("pin", &self.handle.full_name())
            .field("type", &self.handle.pin_type)
            .field("direction", &self.handle.direction)
            .field("previous", &*self.previous.lock())
            .finish()
    }
}

impl fmt::Display for WatchedPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimHal;
    use machinewatch_core::PinSpec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn watched(hal: &Arc<SimHal>, spec: PinSpec) -> WatchedPin {
        let handle = hal.new_pin("gui", &spec).expect("pin");
        WatchedPin::new(hal.clone(), handle)
    }

    #[test]
    fn test_first_poll_reports_initial_value() {
        let hal = Arc::new(SimHal::new());
        let pin = watched(&hal, PinSpec::new("count", PinType::S32, PinDirection::In));

        assert_eq!(pin.poll_once(), Ok(Some(PinValue::S32(0))));
        assert_eq!(pin.poll_once(), Ok(None));
        assert_eq!(pin.last_value(), Some(PinValue::S32(0)));
    }

    #[test]
    fn test_update_emits_only_on_change() {
        let hal = Arc::new(SimHal::new());
        let pin = watched(&hal, PinSpec::new("feed", PinType::Float, PinDirection::In));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        pin.value_changed().connect(move |v| s.lock().push(*v));

        assert_eq!(pin.update(), Ok(true));
        assert_eq!(pin.update(), Ok(false));
        hal.drive("gui", "feed", PinValue::Float(1.5)).expect("drive");
        assert_eq!(pin.update(), Ok(true));
        hal.drive("gui", "feed", PinValue::Float(1.5)).expect("drive");
        assert_eq!(pin.update(), Ok(false));

        assert_eq!(
            *seen.lock(),
            vec![PinValue::Float(0.0), PinValue::Float(1.5)]
        );
    }

    #[test]
    fn test_write_to_input_pin_rejected() {
        let hal = Arc::new(SimHal::new());
        let pin = watched(&hal, PinSpec::new("estop", PinType::Bit, PinDirection::In));

        let err = pin.write(PinValue::Bit(true)).unwrap_err();
        assert!(matches!(err, PinError::InvalidValue { .. }));
        assert_eq!(hal.value("gui", "estop"), Some(PinValue::Bit(false)));
    }

    #[test]
    fn test_write_wrong_type_rejected() {
        let hal = Arc::new(SimHal::new());
        let pin = watched(&hal, PinSpec::new("led", PinType::Bit, PinDirection::Out));

        assert!(matches!(
            pin.write(PinValue::Float(1.0)),
            Err(PinError::InvalidValue { .. })
        ));
        pin.write(PinValue::Bit(true)).expect("write");
        assert_eq!(pin.read(), Ok(PinValue::Bit(true)));
    }

    #[test]
    fn test_read_of_removed_pin_is_stale() {
        let hal = Arc::new(SimHal::new());
        let pin = watched(&hal, PinSpec::new("led", PinType::Bit, PinDirection::Io));
        hal.remove_pin("gui", "led");

        assert!(matches!(pin.read(), Err(PinError::Stale { .. })));
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        pin.value_changed().connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(pin.update().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
