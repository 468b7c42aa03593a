//! In-memory HAL layer.
//!
//! Holds pin values in a map so hosts without a real HAL (tests, previews,
//! demos) can create pins and drive their values from outside.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use machinewatch_core::{HalError, PinHandle, PinSpec, PinValue};

use crate::layer::HalLayer;

#[derive(Debug)]
struct SimPin {
    id: u64,
    spec: PinSpec,
    value: PinValue,
}

#[derive(Debug, Default)]
struct SimState {
    next_id: u64,
    pins: HashMap<(String, String), SimPin>,
    exited: HashSet<String>,
}

/// HAL layer backed by an in-process map
#[derive(Debug, Default)]
pub struct SimHal {
    state: Mutex<SimState>,
}

impl SimHal {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a pin's value from the HAL side, regardless of direction
    pub fn drive(&self, component: &str, name: &str, value: PinValue) -> Result<(), HalError> {
        let mut state = self.state.lock();
        let pin = state
            .pins
            .get_mut(&(component.to_string(), name.to_string()))
            .ok_or_else(|| HalError::NoSuchPin {
                component: component.to_string(),
                name: name.to_string(),
            })?;
        check_type(component, &pin.spec, &value)?;
        pin.value = value;
        Ok(())
    }

    /// Current value of a pin, if it exists
    pub fn value(&self, component: &str, name: &str) -> Option<PinValue> {
        self.state
            .lock()
            .pins
            .get(&(component.to_string(), name.to_string()))
            .map(|pin| pin.value)
    }

    /// Destroy a single pin, leaving its handles stale
    pub fn remove_pin(&self, component: &str, name: &str) -> bool {
        self.state
            .lock()
            .pins
            .remove(&(component.to_string(), name.to_string()))
            .is_some()
    }

    /// Number of live pins
    pub fn pin_count(&self) -> usize {
        self.state.lock().pins.len()
    }

    fn live_pin<'a>(state: &'a mut SimState, pin: &PinHandle) -> Result<&'a mut SimPin, HalError> {
        if state.exited.contains(&pin.component) {
            return Err(HalError::ComponentExited(pin.component.clone()));
        }
        match state
            .pins
            .get_mut(&(pin.component.clone(), pin.name.clone()))
        {
            Some(sim) if sim.id == pin.id => Ok(sim),
            _ => Err(HalError::StaleHandle(pin.full_name())),
        }
    }
}

fn check_type(component: &str, spec: &PinSpec, value: &PinValue) -> Result<(), HalError> {
    if value.pin_type() != spec.pin_type {
        return Err(HalError::TypeMismatch {
            pin: format!("{}.{}", component, spec.name),
            expected: spec.pin_type.to_string(),
        });
    }
    Ok(())
}

impl HalLayer for SimHal {
    fn new_pin(&self, component: &str, spec: &PinSpec) -> Result<PinHandle, HalError> {
        let mut state = self.state.lock();
        if state.exited.contains(component) {
            return Err(HalError::ComponentExited(component.to_string()));
        }
        let key = (component.to_string(), spec.name.clone());
        if state.pins.contains_key(&key) {
            return Err(HalError::DuplicatePin {
                component: component.to_string(),
                name: spec.name.clone(),
            });
        }
        if spec.name.is_empty() {
            return Err(HalError::Other("pin name must not be empty".to_string()));
        }

        state.next_id += 1;
        let id = state.next_id;
        state.pins.insert(
            key,
            SimPin {
                id,
                spec: spec.clone(),
                value: PinValue::zero(spec.pin_type),
            },
        );
        Ok(PinHandle {
            component: component.to_string(),
            name: spec.name.clone(),
            pin_type: spec.pin_type,
            direction: spec.direction,
            id,
        })
    }

    fn get_pin(&self, component: &str, name: &str) -> Result<PinHandle, HalError> {
        let state = self.state.lock();
        if state.exited.contains(component) {
            return Err(HalError::ComponentExited(component.to_string()));
        }
        let pin = state
            .pins
            .get(&(component.to_string(), name.to_string()))
            .ok_or_else(|| HalError::NoSuchPin {
                component: component.to_string(),
                name: name.to_string(),
            })?;
        Ok(PinHandle {
            component: component.to_string(),
            name: name.to_string(),
            pin_type: pin.spec.pin_type,
            direction: pin.spec.direction,
            id: pin.id,
        })
    }

    fn read(&self, pin: &PinHandle) -> Result<PinValue, HalError> {
        let mut state = self.state.lock();
        Self::live_pin(&mut state, pin).map(|sim| sim.value)
    }

    fn write(&self, pin: &PinHandle, value: PinValue) -> Result<(), HalError> {
        let mut state = self.state.lock();
        let sim = Self::live_pin(&mut state, pin)?;
        check_type(&pin.component, &sim.spec, &value)?;
        sim.value = value;
        Ok(())
    }

    fn exit(&self, component: &str) -> Result<(), HalError> {
        let mut state = self.state.lock();
        if !state.exited.insert(component.to_string()) {
            return Err(HalError::ComponentExited(component.to_string()));
        }
        state.pins.retain(|(owner, _), _| owner != component);
        Ok(())
    }
}
