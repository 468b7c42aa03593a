//! Decoders for the raw code lists and joint flags in a status snapshot.
//!
//! Raw G-codes are reported as ten times the code number (`G61.1` is `611`).
//! Both code lists carry the block sequence number in element 0 and pad
//! unused slots with `-1`.

use serde::{Deserialize, Serialize};

/// Active codes in ascending order, without the sequence slot and padding
fn active_codes(raw: &[i32]) -> Vec<i32> {
    let mut codes: Vec<i32> = raw.iter().skip(1).copied().filter(|&c| c != -1).collect();
    codes.sort_unstable();
    codes
}

/// Render a single raw G-code value
pub fn gcode_name(raw: i32) -> String {
    if raw % 10 == 0 {
        format!("G{}", raw / 10)
    } else {
        format!("G{}.{}", raw / 10, raw % 10)
    }
}

/// Render the active G-codes as `"G1 G7.1 G21 "`
pub fn format_gcodes(raw: &[i32]) -> String {
    active_codes(raw)
        .into_iter()
        .map(|code| format!("{} ", gcode_name(code)))
        .collect()
}

/// Render the active M-codes as `"M5 M9 "`
pub fn format_mcodes(raw: &[i32]) -> String {
    active_codes(raw)
        .into_iter()
        .map(|code| format!("M{} ", code))
        .collect()
}

/// Mode flags decoded from the active G-codes
///
/// The controller keeps these in mutually exclusive modal groups; the decoder
/// reports what it sees without enforcing exclusivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModalFlags {
    /// G93 inverse time feed
    pub itime: bool,
    /// G94 units per minute feed
    pub fpm: bool,
    /// G95 units per revolution feed
    pub fpr: bool,
    /// G96 constant surface speed
    pub css: bool,
    /// G97 spindle RPM
    pub rpm: bool,
    /// G21 metric units
    pub metric: bool,
    /// G8 radius mode (lathe)
    pub radius: bool,
    /// G7 diameter mode (lathe)
    pub diameter: bool,
}

impl ModalFlags {
    /// Decode the flags from a raw G-code list
    pub fn from_gcodes(raw: &[i32]) -> Self {
        let mut flags = Self::default();
        for code in active_codes(raw) {
            match code {
                930 => flags.itime = true,
                940 => flags.fpm = true,
                950 => flags.fpr = true,
                960 => flags.css = true,
                970 => flags.rpm = true,
                210 => flags.metric = true,
                70..=79 => flags.diameter = true,
                80..=89 => flags.radius = true,
                _ => {}
            }
        }
        flags
    }
}

/// Homing status restricted to the configured axes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomingSummary {
    /// Digits of every homed joint, ascending
    pub homed: String,
    /// Digits of configured joints not yet homed, ascending
    pub unhomed: String,
    /// Homed joints that are configured
    pub homed_axes: u32,
    /// Configured joints
    pub axis_count: u32,
}

impl HomingSummary {
    /// Summarize `homed` against the configured-axis bitmask
    pub fn compute(homed: &[bool], axis_mask: u32) -> Self {
        let mut summary = Self::default();
        // Configured joints missing from `homed` count as unhomed
        let joints = homed.len().max((u32::BITS - axis_mask.leading_zeros()) as usize);
        for joint in 0..joints {
            let is_homed = homed.get(joint).copied().unwrap_or(false);
            let configured = joint < 32 && axis_mask & (1 << joint) != 0;
            if is_homed {
                summary.homed.push_str(&joint.to_string());
            }
            if configured {
                summary.axis_count += 1;
                if is_homed {
                    summary.homed_axes += 1;
                } else {
                    summary.unhomed.push_str(&joint.to_string());
                }
            }
        }
        summary
    }

    /// Check if any joint is homed
    pub fn any_homed(&self) -> bool {
        !self.homed.is_empty()
    }

    /// Check if every configured joint is homed
    pub fn all_homed(&self) -> bool {
        self.homed_axes == self.axis_count
    }
}
