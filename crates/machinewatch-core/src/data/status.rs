//! Machine status snapshot model.
//!
//! A [`StatusSnapshot`] is one read of the control system's live status. It is
//! produced by a status source each poll and is read-only to the watchers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransportError;

/// Number of position components reported per pose (X Y Z A B C U V W)
pub const POSE_AXES: usize = 9;

/// A full pose, one value per position component
pub type Pose = [f64; POSE_AXES];

/// Task (machine) state
///
/// Ordered: `Estop < EstopReset < Off < On`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum TaskState {
    /// Emergency stop active
    #[default]
    Estop = 1,
    /// Emergency stop released, machine off
    EstopReset = 2,
    /// Machine off
    Off = 3,
    /// Machine on
    On = 4,
}

impl TaskState {
    /// Check if the emergency stop has been released
    pub fn is_estop_reset(&self) -> bool {
        *self > TaskState::Estop
    }
}

impl TryFrom<i32> for TaskState {
    type Error = TransportError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(TaskState::Estop),
            2 => Ok(TaskState::EstopReset),
            3 => Ok(TaskState::Off),
            4 => Ok(TaskState::On),
            other => Err(TransportError::new(format!("unknown task state {}", other))),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Estop => write!(f, "ESTOP"),
            TaskState::EstopReset => write!(f, "ESTOP_RESET"),
            TaskState::Off => write!(f, "OFF"),
            TaskState::On => write!(f, "ON"),
        }
    }
}

/// Task mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskMode {
    /// Manual (jogging) mode
    #[default]
    Manual = 1,
    /// Automatic program execution
    Auto = 2,
    /// Manual data input
    Mdi = 3,
}

impl TryFrom<i32> for TaskMode {
    type Error = TransportError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(TaskMode::Manual),
            2 => Ok(TaskMode::Auto),
            3 => Ok(TaskMode::Mdi),
            other => Err(TransportError::new(format!("unknown task mode {}", other))),
        }
    }
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskMode::Manual => write!(f, "MANUAL"),
            TaskMode::Auto => write!(f, "AUTO"),
            TaskMode::Mdi => write!(f, "MDI"),
        }
    }
}

/// Interpreter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpState {
    /// Not executing
    #[default]
    Idle = 1,
    /// Reading ahead
    Reading = 2,
    /// Paused
    Paused = 3,
    /// Waiting for motion or I/O
    Waiting = 4,
}

impl InterpState {
    /// Check if the interpreter is executing (anything but idle)
    pub fn is_running(&self) -> bool {
        !matches!(self, InterpState::Idle)
    }
}

impl TryFrom<i32> for InterpState {
    type Error = TransportError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(InterpState::Idle),
            2 => Ok(InterpState::Reading),
            3 => Ok(InterpState::Paused),
            4 => Ok(InterpState::Waiting),
            other => Err(TransportError::new(format!(
                "unknown interpreter state {}",
                other
            ))),
        }
    }
}

impl fmt::Display for InterpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpState::Idle => write!(f, "IDLE"),
            InterpState::Reading => write!(f, "READING"),
            InterpState::Paused => write!(f, "PAUSED"),
            InterpState::Waiting => write!(f, "WAITING"),
        }
    }
}

/// One read of the control system's live status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Task state
    pub task_state: TaskState,
    /// Task mode
    pub task_mode: TaskMode,
    /// Interpreter state
    pub interp_state: InterpState,
    /// Subroutine/remap nesting depth; zero at top level
    pub call_level: u32,
    /// Path of the loaded program file
    pub file: String,
    /// Line currently executing in motion
    pub motion_line: i32,
    /// Per-joint homed flags
    pub homed: Vec<bool>,
    /// Per-joint override-limits flags
    pub override_limits: Vec<bool>,
    /// Bit N set when axis N is configured
    pub axis_mask: u32,
    /// Tool number loaded in the spindle
    pub tool_in_spindle: i32,
    /// Program paused
    pub paused: bool,
    /// Block delete switch
    pub block_delete: bool,
    /// Optional stop switch
    pub optional_stop: bool,
    /// Spindle enabled
    pub spindle_enabled: bool,
    /// Spindle direction: -1 reverse, 0 stopped, 1 forward
    pub spindle_direction: i32,
    /// Feed override ratio
    pub feed_rate: f64,
    /// Spindle override ratio
    pub spindle_rate: f64,
    /// Rapid override ratio
    pub rapid_rate: f64,
    /// Feed hold enabled
    pub feed_hold_enabled: bool,
    /// Active work coordinate system (1 = G54)
    pub g5x_index: i32,
    /// Raw active G-codes; element 0 is the block sequence number
    pub gcodes: Vec<i32>,
    /// Raw active M-codes; element 0 is the block sequence number
    pub mcodes: Vec<i32>,
    /// Current velocity in units per second
    pub current_vel: f64,
    /// Actual machine position
    pub actual_position: Pose,
    /// Active work coordinate offset
    pub g5x_offset: Pose,
    /// Tool length offset
    pub tool_offset: Pose,
    /// G92 offset
    pub g92_offset: Pose,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            task_state: TaskState::Estop,
            task_mode: TaskMode::Manual,
            interp_state: InterpState::Idle,
            call_level: 0,
            file: String::new(),
            motion_line: 0,
            homed: vec![false; 9],
            override_limits: vec![false; 9],
            axis_mask: 0b111,
            tool_in_spindle: 0,
            paused: false,
            block_delete: false,
            optional_stop: false,
            spindle_enabled: false,
            spindle_direction: 0,
            feed_rate: 1.0,
            spindle_rate: 1.0,
            rapid_rate: 1.0,
            feed_hold_enabled: true,
            g5x_index: 1,
            gcodes: vec![0],
            mcodes: vec![0],
            current_vel: 0.0,
            actual_position: [0.0; POSE_AXES],
            g5x_offset: [0.0; POSE_AXES],
            tool_offset: [0.0; POSE_AXES],
            g92_offset: [0.0; POSE_AXES],
        }
    }
}

impl StatusSnapshot {
    /// Current feed rate in units per minute
    pub fn feed_rate_per_minute(&self) -> f64 {
        self.current_vel * 60.0
    }

    /// X position relative to the active work, tool and G92 offsets
    pub fn x_relative_position(&self) -> f64 {
        self.actual_position[0] - self.g5x_offset[0] - self.tool_offset[0] - self.g92_offset[0]
    }
}
