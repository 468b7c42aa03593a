//! # MachineWatch HAL
//!
//! Observes hardware abstraction layer pins. Each [`WatchedPin`] remembers the
//! value seen on the previous poll; the shared [`PinRegistry`] polls every
//! live pin on one timer and fires `value_changed` for the pins that moved.
//! Pins that can no longer be read are evicted without disturbing the rest.

pub mod component;
pub mod layer;
pub mod pin;
pub mod registry;
pub mod sim;

pub use component::HalComponent;
pub use layer::HalLayer;
pub use pin::WatchedPin;
pub use registry::{PinRegistry, PollReport, DEFAULT_PIN_INTERVAL};
pub use sim::SimHal;
