//! Data models shared by the watchers.

pub mod pin;
pub mod status;

pub use pin::{PinDirection, PinHandle, PinSpec, PinType, PinValue};
pub use status::{InterpState, Pose, StatusSnapshot, TaskMode, TaskState, POSE_AXES};
