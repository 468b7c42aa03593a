//! # MachineWatch Core
//!
//! Core types shared by the MachineWatch crates:
//! the error taxonomy, typed notification channels, the status and pin data
//! models, and the periodic timers that drive poll cycles.

pub mod data;
pub mod error;
pub mod scheduler;
pub mod signal;

pub use data::{
    InterpState, PinDirection, PinHandle, PinSpec, PinType, PinValue, Pose, StatusSnapshot,
    TaskMode, TaskState, POSE_AXES,
};

pub use error::{
    Error, FieldError, HalError, PinError, Result, SchedulerError, TransportError,
};

pub use scheduler::{ManualScheduler, Scheduler, TickCallback, TokioScheduler};

pub use signal::{Signal, SubscriptionId};
