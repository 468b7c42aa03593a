//! HAL pin model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type of a HAL pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinType {
    /// Single bit
    Bit,
    /// Signed 32-bit integer
    S32,
    /// Unsigned 32-bit integer
    U32,
    /// 64-bit float
    Float,
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinType::Bit => write!(f, "bit"),
            PinType::S32 => write!(f, "s32"),
            PinType::U32 => write!(f, "u32"),
            PinType::Float => write!(f, "float"),
        }
    }
}

/// Data direction, from the owning component's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// Written by HAL, read by the component
    In,
    /// Written by the component
    Out,
    /// Written by both
    Io,
}

impl PinDirection {
    /// Check if the owning component may write this pin
    pub fn is_writable(&self) -> bool {
        !matches!(self, PinDirection::In)
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinDirection::In => write!(f, "in"),
            PinDirection::Out => write!(f, "out"),
            PinDirection::Io => write!(f, "io"),
        }
    }
}

/// Current value of a pin
///
/// Equality is the natural equality of the payload; floats compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PinValue {
    /// Bit value
    Bit(bool),
    /// Signed integer value
    S32(i32),
    /// Unsigned integer value
    U32(u32),
    /// Float value
    Float(f64),
}

impl PinValue {
    /// The pin type this value belongs to
    pub fn pin_type(&self) -> PinType {
        match self {
            PinValue::Bit(_) => PinType::Bit,
            PinValue::S32(_) => PinType::S32,
            PinValue::U32(_) => PinType::U32,
            PinValue::Float(_) => PinType::Float,
        }
    }

    /// The zero value of a pin type
    pub fn zero(pin_type: PinType) -> Self {
        match pin_type {
            PinType::Bit => PinValue::Bit(false),
            PinType::S32 => PinValue::S32(0),
            PinType::U32 => PinValue::U32(0),
            PinType::Float => PinValue::Float(0.0),
        }
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinValue::Bit(v) => write!(f, "{}", v),
            PinValue::S32(v) => write!(f, "{}", v),
            PinValue::U32(v) => write!(f, "{}", v),
            PinValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Requested pin: name within the component, type and direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinSpec {
    /// Pin name within its component
    pub name: String,
    /// Value type
    pub pin_type: PinType,
    /// Data direction
    pub direction: PinDirection,
}

impl PinSpec {
    /// Create a pin spec
    pub fn new(name: impl Into<String>, pin_type: PinType, direction: PinDirection) -> Self {
        Self {
            name: name.into(),
            pin_type,
            direction,
        }
    }
}

/// Opaque handle to a pin owned by the HAL layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinHandle {
    /// Owning component name
    pub component: String,
    /// Pin name within the component
    pub name: String,
    /// Value type
    pub pin_type: PinType,
    /// Data direction
    pub direction: PinDirection,
    /// Layer-specific identity
    pub id: u64,
}

impl PinHandle {
    /// The spec this pin was created with
    pub fn spec(&self) -> PinSpec {
        PinSpec::new(self.name.clone(), self.pin_type, self.direction)
    }

    /// Fully qualified `component.pin` name
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.component, self.name)
    }
}

impl fmt::Display for PinHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.name)
    }
}
