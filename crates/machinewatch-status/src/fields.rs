//! Enumerated field access for scripting and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use machinewatch_core::{FieldError, InterpState, TaskMode, TaskState};

use crate::derived::DerivedState;

/// A tracked status field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusField {
    State,
    Mode,
    Interp,
    File,
    Line,
    Homed,
    ToolInSpindle,
    Paused,
    SpindleOverride,
    FeedOverride,
    RapidOverride,
    FeedHold,
    G5xIndex,
    SpindleEnabled,
    SpindleDirection,
    BlockDelete,
    OptionalStop,
    OverrideLimits,
    GCode,
    MCode,
    Itime,
    Fpm,
    Fpr,
    Css,
    Rpm,
    Metric,
    Radius,
    Diameter,
    /// UI-local jog rate; not part of the derived state
    JogRate,
}

impl StatusField {
    /// Every field
    pub const ALL: [StatusField; 29] = [
        StatusField::State,
        StatusField::Mode,
        StatusField::Interp,
        StatusField::File,
        StatusField::Line,
        StatusField::Homed,
        StatusField::ToolInSpindle,
        StatusField::Paused,
        StatusField::SpindleOverride,
        StatusField::FeedOverride,
        StatusField::RapidOverride,
        StatusField::FeedHold,
        StatusField::G5xIndex,
        StatusField::SpindleEnabled,
        StatusField::SpindleDirection,
        StatusField::BlockDelete,
        StatusField::OptionalStop,
        StatusField::OverrideLimits,
        StatusField::GCode,
        StatusField::MCode,
        StatusField::Itime,
        StatusField::Fpm,
        StatusField::Fpr,
        StatusField::Css,
        StatusField::Rpm,
        StatusField::Metric,
        StatusField::Radius,
        StatusField::Diameter,
        StatusField::JogRate,
    ];

    /// Field name used for keyed access
    pub fn name(&self) -> &'static str {
        match self {
            StatusField::State => "state",
            StatusField::Mode => "mode",
            StatusField::Interp => "interp",
            StatusField::File => "file",
            StatusField::Line => "line",
            StatusField::Homed => "homed",
            StatusField::ToolInSpindle => "tool_in_spindle",
            StatusField::Paused => "paused",
            StatusField::SpindleOverride => "spindle_or",
            StatusField::FeedOverride => "feed_or",
            StatusField::RapidOverride => "rapid_or",
            StatusField::FeedHold => "feed_hold",
            StatusField::G5xIndex => "g5x_index",
            StatusField::SpindleEnabled => "spindle_enabled",
            StatusField::SpindleDirection => "spindle_direction",
            StatusField::BlockDelete => "block_delete",
            StatusField::OptionalStop => "optional_stop",
            StatusField::OverrideLimits => "override_limits",
            StatusField::GCode => "g_code",
            StatusField::MCode => "m_code",
            StatusField::Itime => "itime",
            StatusField::Fpm => "fpm",
            StatusField::Fpr => "fpr",
            StatusField::Css => "css",
            StatusField::Rpm => "rpm",
            StatusField::Metric => "metric",
            StatusField::Radius => "radius",
            StatusField::Diameter => "diameter",
            StatusField::JogRate => "jog_rate",
        }
    }

    fn mismatch(&self, expected: &str) -> FieldError {
        FieldError::TypeMismatch {
            field: self.name().to_string(),
            expected: expected.to_string(),
        }
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StatusField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// Value of a tracked field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    Text(String),
    Flags(Vec<bool>),
    State(TaskState),
    Mode(TaskMode),
    Interp(InterpState),
}

impl FieldValue {
    /// Kind name, as used in type-mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
            FieldValue::Flags(_) => "flags",
            FieldValue::State(_) => "state",
            FieldValue::Mode(_) => "mode",
            FieldValue::Interp(_) => "interp",
        }
    }
}

impl DerivedState {
    /// Read a field; `None` for the jog rate, which the watcher owns
    pub fn field(&self, field: StatusField) -> Option<FieldValue> {
        let value = match field {
            StatusField::State => FieldValue::State(self.state),
            StatusField::Mode => FieldValue::Mode(self.mode),
            StatusField::Interp => FieldValue::Interp(self.interp),
            StatusField::File => FieldValue::Text(self.file.clone()),
            StatusField::Line => FieldValue::Int(self.line),
            StatusField::Homed => FieldValue::Flags(self.homed.clone()),
            StatusField::ToolInSpindle => FieldValue::Int(self.tool_in_spindle),
            StatusField::Paused => FieldValue::Bool(self.paused),
            StatusField::SpindleOverride => FieldValue::Float(self.spindle_override),
            StatusField::FeedOverride => FieldValue::Float(self.feed_override),
            StatusField::RapidOverride => FieldValue::Float(self.rapid_override),
            StatusField::FeedHold => FieldValue::Bool(self.feed_hold),
            StatusField::G5xIndex => FieldValue::Int(self.g5x_index),
            StatusField::SpindleEnabled => FieldValue::Bool(self.spindle_enabled),
            StatusField::SpindleDirection => FieldValue::Int(self.spindle_direction),
            StatusField::BlockDelete => FieldValue::Bool(self.block_delete),
            StatusField::OptionalStop => FieldValue::Bool(self.optional_stop),
            StatusField::OverrideLimits => FieldValue::Flags(self.override_limits.clone()),
            StatusField::GCode => FieldValue::Text(self.g_code.clone()),
            StatusField::MCode => FieldValue::Text(self.m_code.clone()),
            StatusField::Itime => FieldValue::Bool(self.modes.itime),
            StatusField::Fpm => FieldValue::Bool(self.modes.fpm),
            StatusField::Fpr => FieldValue::Bool(self.modes.fpr),
            StatusField::Css => FieldValue::Bool(self.modes.css),
            StatusField::Rpm => FieldValue::Bool(self.modes.rpm),
            StatusField::Metric => FieldValue::Bool(self.modes.metric),
            StatusField::Radius => FieldValue::Bool(self.modes.radius),
            StatusField::Diameter => FieldValue::Bool(self.modes.diameter),
            StatusField::JogRate => return None,
        };
        Some(value)
    }

    /// Overwrite a field
    ///
    /// The jog rate is not stored here and is rejected as unknown.
    pub fn set_field(&mut self, field: StatusField, value: FieldValue) -> Result<(), FieldError> {
        match (field, value) {
            (StatusField::State, FieldValue::State(v)) => self.state = v,
            (StatusField::Mode, FieldValue::Mode(v)) => self.mode = v,
            (StatusField::Interp, FieldValue::Interp(v)) => self.interp = v,
            (StatusField::File, FieldValue::Text(v)) => self.file = v,
            (StatusField::Line, FieldValue::Int(v)) => self.line = v,
            (StatusField::Homed, FieldValue::Flags(v)) => self.homed = v,
            (StatusField::ToolInSpindle, FieldValue::Int(v)) => self.tool_in_spindle = v,
            (StatusField::Paused, FieldValue::Bool(v)) => self.paused = v,
            (StatusField::SpindleOverride, FieldValue::Float(v)) => self.spindle_override = v,
            (StatusField::FeedOverride, FieldValue::Float(v)) => self.feed_override = v,
            (StatusField::RapidOverride, FieldValue::Float(v)) => self.rapid_override = v,
            (StatusField::FeedHold, FieldValue::Bool(v)) => self.feed_hold = v,
            (StatusField::G5xIndex, FieldValue::Int(v)) => self.g5x_index = v,
            (StatusField::SpindleEnabled, FieldValue::Bool(v)) => self.spindle_enabled = v,
            (StatusField::SpindleDirection, FieldValue::Int(v)) => self.spindle_direction = v,
            (StatusField::BlockDelete, FieldValue::Bool(v)) => self.block_delete = v,
            (StatusField::OptionalStop, FieldValue::Bool(v)) => self.optional_stop = v,
            (StatusField::OverrideLimits, FieldValue::Flags(v)) => self.override_limits = v,
            (StatusField::GCode, FieldValue::Text(v)) => self.g_code = v,
            (StatusField::MCode, FieldValue::Text(v)) => self.m_code = v,
            (StatusField::Itime, FieldValue::Bool(v)) => self.modes.itime = v,
            (StatusField::Fpm, FieldValue::Bool(v)) => self.modes.fpm = v,
            (StatusField::Fpr, FieldValue::Bool(v)) => self.modes.fpr = v,
            (StatusField::Css, FieldValue::Bool(v)) => self.modes.css = v,
            (StatusField::Rpm, FieldValue::Bool(v)) => self.modes.rpm = v,
            (StatusField::Metric, FieldValue::Bool(v)) => self.modes.metric = v,
            (StatusField::Radius, FieldValue::Bool(v)) => self.modes.radius = v,
            (StatusField::Diameter, FieldValue::Bool(v)) => self.modes.diameter = v,
            (StatusField::JogRate, _) => {
                return Err(FieldError::UnknownField(field.name().to_string()))
            }
            (field, _) => {
                let expected = self
                    .field(field)
                    .map(|current| current.kind())
                    .unwrap_or("value");
                return Err(field.mismatch(expected));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse() {
        for field in StatusField::ALL {
            assert_eq!(field.name().parse::<StatusField>(), Ok(field));
        }
        assert_eq!(
            "spindle_or".parse::<StatusField>(),
            Ok(StatusField::SpindleOverride)
        );
        assert_eq!(
            "bogus".parse::<StatusField>(),
            Err(FieldError::UnknownField("bogus".to_string()))
        );
    }

    #[test]
    fn test_every_derived_field_readable() {
        let state = DerivedState::default();
        for field in StatusField::ALL {
            assert_eq!(state.field(field).is_some(), field != StatusField::JogRate);
        }
    }

    #[test]
    fn test_set_field() {
        let mut state = DerivedState::default();
        state
            .set_field(StatusField::Line, FieldValue::Int(77))
            .expect("set");
        assert_eq!(state.field(StatusField::Line), Some(FieldValue::Int(77)));

        state
            .set_field(StatusField::Metric, FieldValue::Bool(true))
            .expect("set");
        assert!(state.modes.metric);

        let err = state
            .set_field(StatusField::Line, FieldValue::Text("x".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                field: "line".to_string(),
                expected: "int".to_string()
            }
        );
    }
}
