//! Error handling for MachineWatch
//!
//! Provides the error types for both watch subsystems:
//! - HAL errors (reported by the hardware pin layer)
//! - Pin errors (surfaced to widget code calling pin operations)
//! - Transport errors (status source poll failures)
//! - Field errors (enumerated field access)
//! - Scheduler errors (timer start-up)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Errors reported by a hardware abstraction layer implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HalError {
    /// A pin with this name already exists on the component
    #[error("Pin {component}.{name} already exists")]
    DuplicatePin {
        /// Owning component name.
        component: String,
        /// Pin name within the component.
        name: String,
    },

    /// No pin with this name exists on the component
    #[error("Pin {component}.{name} does not exist")]
    NoSuchPin {
        /// Owning component name.
        component: String,
        /// Pin name within the component.
        name: String,
    },

    /// The handle refers to a pin that has been destroyed
    #[error("Stale pin handle {0}")]
    StaleHandle(String),

    /// The owning component has exited
    #[error("Component {0} has exited")]
    ComponentExited(String),

    /// The value type does not match the pin type
    #[error("Pin {pin} expects a {expected} value")]
    TypeMismatch {
        /// Full pin name.
        pin: String,
        /// Expected pin type name.
        expected: String,
    },

    /// Generic HAL error
    #[error("HAL error: {0}")]
    Other(String),
}

/// Errors surfaced by pin operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PinError {
    /// The HAL rejected the pin specification; nothing was registered
    #[error("Failed to create pin {name}: {source}")]
    Creation {
        /// Requested pin name.
        name: String,
        /// Underlying HAL failure.
        #[source]
        source: HalError,
    },

    /// The value cannot be written to this pin
    #[error("Invalid value for pin {pin}: {reason}")]
    InvalidValue {
        /// Full pin name.
        pin: String,
        /// Why the write was refused.
        reason: String,
    },

    /// The pin (or its component) no longer exists
    #[error("Pin {pin} is stale: {source}")]
    Stale {
        /// Full pin name.
        pin: String,
        /// Underlying HAL failure.
        #[source]
        source: HalError,
    },

    /// Any other HAL failure during a pass-through call
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// Status source poll failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Status transport error: {message}")]
pub struct TransportError {
    /// What went wrong while polling.
    pub message: String,
}

impl TransportError {
    /// Create a transport error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised by enumerated field access on a watcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// No field has this name
    #[error("Unknown status field: {0}")]
    UnknownField(String),

    /// The supplied value has the wrong type for the field
    #[error("Field {field} expects a {expected} value")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Expected value kind.
        expected: String,
    },
}

/// Errors raised when starting a periodic timer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// A tokio-backed timer was started outside a runtime
    #[error("No tokio runtime available to drive the timer")]
    NoRuntime,

    /// The timer already has a callback installed
    #[error("Timer is already running")]
    AlreadyRunning,
}

/// Main error type for MachineWatch
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// HAL layer error
    #[error(transparent)]
    Hal(#[from] HalError),

    /// Pin operation error
    #[error(transparent)]
    Pin(#[from] PinError),

    /// Status transport error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Field access error
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Timer error
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a stale pin error
    pub fn is_stale_pin(&self) -> bool {
        matches!(
            self,
            Error::Pin(PinError::Stale { .. })
                | Error::Hal(HalError::StaleHandle(_) | HalError::ComponentExited(_))
        )
    }

    /// Check if this is a transport error
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Check if this is a pin error
    pub fn is_pin_error(&self) -> bool {
        matches!(self, Error::Pin(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
