//! Hardware abstraction layer interface.
//!
//! The HAL owns pins and their values; watchers only hold handles. An
//! implementation must report a distinguishable error
//! ([`HalError::StaleHandle`], [`HalError::ComponentExited`] or
//! [`HalError::NoSuchPin`]) when a handle no longer refers to a live pin.

use machinewatch_core::{HalError, PinHandle, PinSpec, PinValue};

/// Pin access provided by the hardware abstraction layer
pub trait HalLayer: Send + Sync {
    /// Create a new pin on `component`
    fn new_pin(&self, component: &str, spec: &PinSpec) -> Result<PinHandle, HalError>;

    /// Resolve an existing pin on `component`
    fn get_pin(&self, component: &str, name: &str) -> Result<PinHandle, HalError>;

    /// Read the current value of a pin
    fn read(&self, pin: &PinHandle) -> Result<PinValue, HalError>;

    /// Write a new value to a pin
    fn write(&self, pin: &PinHandle, value: PinValue) -> Result<(), HalError>;

    /// Tear down a component and every pin it owns
    fn exit(&self, component: &str) -> Result<(), HalError>;
}

/// Whether a HAL error means the pin itself is gone
pub fn is_stale(error: &HalError) -> bool {
    matches!(
        error,
        HalError::StaleHandle(_) | HalError::ComponentExited(_) | HalError::NoSuchPin { .. }
    )
}
