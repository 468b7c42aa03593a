//! HAL component wrapper that hands out observed pins.

use std::sync::Arc;

use machinewatch_core::{PinError, PinSpec, PinValue};

use crate::layer::{is_stale, HalLayer};
use crate::pin::WatchedPin;
use crate::registry::PinRegistry;

/// A named HAL component whose pins are observed by the shared registry
#[derive(Clone)]
pub struct HalComponent {
    name: String,
    layer: Arc<dyn HalLayer>,
    registry: Arc<PinRegistry>,
}

impl HalComponent {
    /// Bind a component name on `layer` to `registry`
    pub fn new(layer: Arc<dyn HalLayer>, name: impl Into<String>, registry: Arc<PinRegistry>) -> Self {
        Self {
            name: name.into(),
            layer,
            registry,
        }
    }

    /// Component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a new pin and start observing it
    ///
    /// Nothing is registered if the HAL rejects the pin spec.
    pub fn new_pin(&self, spec: PinSpec) -> Result<Arc<WatchedPin>, PinError> {
        let handle = self
            .layer
            .new_pin(&self.name, &spec)
            .map_err(|source| PinError::Creation {
                name: spec.name.clone(),
                source,
            })?;
        Ok(self.observe(WatchedPin::new(self.layer.clone(), handle)))
    }

    /// Resolve an existing pin and start observing it
    pub fn get_pin(&self, name: &str) -> Result<Arc<WatchedPin>, PinError> {
        let handle = self
            .layer
            .get_pin(&self.name, name)
            .map_err(|source| PinError::Creation {
                name: name.to_string(),
                source,
            })?;
        Ok(self.observe(WatchedPin::new(self.layer.clone(), handle)))
    }

    /// Read a pin by name without observing it
    pub fn get(&self, name: &str) -> Result<PinValue, PinError> {
        let handle = self
            .layer
            .get_pin(&self.name, name)
            .map_err(|e| self.lookup_error(name, e))?;
        self.layer
            .read(&handle)
            .map_err(|e| self.lookup_error(name, e))
    }

    /// Write a pin by name
    pub fn set(&self, name: &str, value: PinValue) -> Result<(), PinError> {
        let handle = self
            .layer
            .get_pin(&self.name, name)
            .map_err(|e| self.lookup_error(name, e))?;
        WatchedPin::new(self.layer.clone(), handle).write(value)
    }

    /// Tear the component down; its pins drop out of the registry on the next pass
    pub fn exit(&self) -> Result<(), PinError> {
        tracing::info!("Component {} exiting", self.name);
        self.layer.exit(&self.name).map_err(PinError::from)
    }

    fn observe(&self, pin: WatchedPin) -> Arc<WatchedPin> {
        let pin = Arc::new(pin);
        self.registry.register(pin.clone());
        pin
    }

    fn lookup_error(&self, name: &str, error: machinewatch_core::HalError) -> PinError {
        if is_stale(&error) {
            PinError::Stale {
                pin: format!("{}.{}", self.name, name),
                source: error,
            }
        } else {
            PinError::Hal(error)
        }
    }
}

impl std::fmt::Debug for HalComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HalComponent")
            .field("name", &self.name)
            .finish()
    }
}
