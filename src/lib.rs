//! # MachineWatch
//!
//! Turns a machine controller's polled state into typed notifications for
//! user-interface widgets.
//!
//! ## Architecture
//!
//! MachineWatch is organized as a workspace with multiple crates:
//!
//! 1. **machinewatch-core** - Errors, notification channels, data models, timers
//! 2. **machinewatch-hal** - HAL pin observation and the live-pin registry
//! 3. **machinewatch-status** - Status polling, diffing and the event catalogue
//! 4. **machinewatch-settings** - Configuration files
//! 5. **machinewatch** - [`WatchContext`] and logging, tying the crates together

pub mod context;
pub mod logging;

pub use context::WatchContext;
pub use logging::init_logging;

pub use machinewatch_core::{
    Error, FieldError, HalError, InterpState, ManualScheduler, PinDirection, PinError, PinSpec,
    PinType, PinValue, Result, Scheduler, SchedulerError, Signal, StatusSnapshot, SubscriptionId,
    TaskMode, TaskState, TokioScheduler, TransportError,
};

pub use machinewatch_hal::{HalComponent, HalLayer, PinRegistry, SimHal, WatchedPin};

pub use machinewatch_status::{
    ChannelFilter, CycleOutcome, DerivedState, FieldValue, SimStatusHandle, SimStatusSource,
    StatusChannel, StatusEvent, StatusField, StatusSignals, StatusSource, StatusWatcher,
};

pub use machinewatch_settings::{LogFormat, LoggingSettings, WatchConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
