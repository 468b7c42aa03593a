//! Derived status: the decoded view of a snapshot the watcher diffs.

use serde::{Deserialize, Serialize};

use machinewatch_core::{InterpState, StatusSnapshot, TaskMode, TaskState};

use crate::decode::{format_gcodes, format_mcodes, ModalFlags};

/// Every tracked field, decoded from one snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedState {
    pub state: TaskState,
    pub mode: TaskMode,
    pub interp: InterpState,
    /// Loaded program; only follows the snapshot at call level zero
    pub file: String,
    pub line: i32,
    pub homed: Vec<bool>,
    pub tool_in_spindle: i32,
    pub paused: bool,
    pub spindle_override: f64,
    pub feed_override: f64,
    pub rapid_override: f64,
    pub feed_hold: bool,
    pub g5x_index: i32,
    pub spindle_enabled: bool,
    pub spindle_direction: i32,
    pub block_delete: bool,
    pub optional_stop: bool,
    /// Override-limit flags for the reported joints
    pub override_limits: Vec<bool>,
    pub g_code: String,
    pub m_code: String,
    pub modes: ModalFlags,
}

impl DerivedState {
    /// Decode `snapshot`
    ///
    /// `previous` supplies the file name while the interpreter is inside a
    /// subroutine or remap. `override_limit_joints` is the number of joints
    /// whose override-limit flags are reported.
    pub fn from_snapshot(
        snapshot: &StatusSnapshot,
        previous: Option<&DerivedState>,
        override_limit_joints: usize,
    ) -> Self {
        let file = if snapshot.call_level == 0 {
            snapshot.file.clone()
        } else {
            previous.map(|p| p.file.clone()).unwrap_or_default()
        };

        let override_limits = (0..override_limit_joints)
            .map(|joint| snapshot.override_limits.get(joint).copied().unwrap_or(false))
            .collect();

        Self {
            state: snapshot.task_state,
            mode: snapshot.task_mode,
            interp: snapshot.interp_state,
            file,
            line: snapshot.motion_line,
            homed: snapshot.homed.clone(),
            tool_in_spindle: snapshot.tool_in_spindle,
            paused: snapshot.paused,
            spindle_override: snapshot.spindle_rate,
            feed_override: snapshot.feed_rate,
            rapid_override: snapshot.rapid_rate,
            feed_hold: snapshot.feed_hold_enabled,
            g5x_index: snapshot.g5x_index,
            spindle_enabled: snapshot.spindle_enabled,
            spindle_direction: snapshot.spindle_direction,
            block_delete: snapshot.block_delete,
            optional_stop: snapshot.optional_stop,
            override_limits,
            g_code: format_gcodes(&snapshot.gcodes),
            m_code: format_mcodes(&snapshot.mcodes),
            modes: ModalFlags::from_gcodes(&snapshot.gcodes),
        }
    }
}
