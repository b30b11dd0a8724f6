//! Typed Values
//!
//! A [`Value`] is the tagged variant carried by value nodes, node-local
//! properties and value links. The engine only looks at the [`DataType`]
//! tag when it decides whether two sides may be bound together; the
//! payload is opaque to it.
//!
//! # Conversions
//!
//! The typed accessors (`as_bool`, `as_int`, ...) never silently default.
//! A read of the wrong type is a [`DirectorError::TypeMismatch`]. The only
//! implicit conversions are the numeric widenings between `Int`, `Float`
//! and `Double`, which mirror what [`DataType::can_connect_to`] accepts at
//! bind time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DirectorError, Result};

/// The type tag of a value, link or property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// `true` / `false`.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// UTF-8 text.
    String,
    /// Two-component vector.
    Vec2,
    /// Three-component vector.
    Vec3,
    /// Four-component vector.
    Vec4,
    /// Identifier of an actor in the host simulation.
    ActorId,
    /// Accepts any type. Only meaningful on links.
    Any,
}

impl DataType {
    /// Whether this type belongs to the numeric family.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Double)
    }

    /// Check if a value of this type may be bound to a link of `other`.
    pub fn can_connect_to(self, other: DataType) -> bool {
        if self == Self::Any || other == Self::Any || self == other {
            return true;
        }
        self.is_numeric() && other.is_numeric()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::ActorId => "actor id",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// A typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i32),
    /// Single precision value.
    Float(f32),
    /// Double precision value.
    Double(f64),
    /// Text value.
    String(String),
    /// 2D vector.
    Vec2([f32; 2]),
    /// 3D vector.
    Vec3([f32; 3]),
    /// 4D vector.
    Vec4([f32; 4]),
    /// Actor identifier. Empty means "no actor".
    ActorId(String),
}

impl Value {
    /// The zero value of a type.
    ///
    /// `Any` has no natural zero and defaults to an empty string.
    pub fn default_for(data_type: DataType) -> Self {
        match data_type {
            DataType::Bool => Self::Bool(false),
            DataType::Int => Self::Int(0),
            DataType::Float => Self::Float(0.0),
            DataType::Double => Self::Double(0.0),
            DataType::String | DataType::Any => Self::String(String::new()),
            DataType::Vec2 => Self::Vec2([0.0; 2]),
            DataType::Vec3 => Self::Vec3([0.0; 3]),
            DataType::Vec4 => Self::Vec4([0.0; 4]),
            DataType::ActorId => Self::ActorId(String::new()),
        }
    }

    /// The type tag of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::String(_) => DataType::String,
            Self::Vec2(_) => DataType::Vec2,
            Self::Vec3(_) => DataType::Vec3,
            Self::Vec4(_) => DataType::Vec4,
            Self::ActorId(_) => DataType::ActorId,
        }
    }

    fn mismatch(&self, expected: DataType) -> DirectorError {
        DirectorError::TypeMismatch {
            expected,
            found: self.data_type(),
        }
    }

    /// Read as a boolean.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.mismatch(DataType::Bool)),
        }
    }

    /// Read as an integer. Floating point values are truncated.
    pub fn as_int(&self) -> Result<i32> {
        match self {
            Self::Int(i) => Ok(*i),
            Self::Float(v) => Ok(*v as i32),
            Self::Double(v) => Ok(*v as i32),
            other => Err(other.mismatch(DataType::Int)),
        }
    }

    /// Read as a single precision float.
    pub fn as_float(&self) -> Result<f32> {
        match self {
            Self::Int(i) => Ok(*i as f32),
            Self::Float(v) => Ok(*v),
            Self::Double(v) => Ok(*v as f32),
            other => Err(other.mismatch(DataType::Float)),
        }
    }

    /// Read as a double precision float.
    pub fn as_double(&self) -> Result<f64> {
        match self {
            Self::Int(i) => Ok(f64::from(*i)),
            Self::Float(v) => Ok(f64::from(*v)),
            Self::Double(v) => Ok(*v),
            other => Err(other.mismatch(DataType::Double)),
        }
    }

    /// Borrow the text of a string value.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.mismatch(DataType::String)),
        }
    }

    /// Read as a 2D vector.
    pub fn as_vec2(&self) -> Result<[f32; 2]> {
        match self {
            Self::Vec2(v) => Ok(*v),
            other => Err(other.mismatch(DataType::Vec2)),
        }
    }

    /// Read as a 3D vector.
    pub fn as_vec3(&self) -> Result<[f32; 3]> {
        match self {
            Self::Vec3(v) => Ok(*v),
            other => Err(other.mismatch(DataType::Vec3)),
        }
    }

    /// Read as a 4D vector.
    pub fn as_vec4(&self) -> Result<[f32; 4]> {
        match self {
            Self::Vec4(v) => Ok(*v),
            other => Err(other.mismatch(DataType::Vec4)),
        }
    }

    /// Borrow the identifier of an actor value.
    pub fn as_actor_id(&self) -> Result<&str> {
        match self {
            Self::ActorId(id) => Ok(id),
            other => Err(other.mismatch(DataType::ActorId)),
        }
    }

    /// Convert this value to `target`, applying the numeric widenings.
    ///
    /// `Any` accepts the value unchanged.
    pub fn coerce(self, target: DataType) -> Result<Value> {
        let found = self.data_type();
        if target == DataType::Any || target == found {
            return Ok(self);
        }
        match target {
            DataType::Int if found.is_numeric() => self.as_int().map(Value::Int),
            DataType::Float if found.is_numeric() => self.as_float().map(Value::Float),
            DataType::Double if found.is_numeric() => self.as_double().map(Value::Double),
            _ => Err(DirectorError::TypeMismatch {
                expected: target,
                found,
            }),
        }
    }

    /// Numeric addition that keeps the type of `self`.
    pub fn add(&self, rhs: &Value) -> Result<Value> {
        match self {
            Self::Int(i) => Ok(Self::Int(i.wrapping_add(rhs.as_int()?))),
            Self::Float(v) => Ok(Self::Float(v + rhs.as_float()?)),
            Self::Double(v) => Ok(Self::Double(v + rhs.as_double()?)),
            other => Err(other.mismatch(DataType::Double)),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(s) | Self::ActorId(s) => f.write_str(s),
            Self::Vec2([x, y]) => write!(f, "{x}, {y}"),
            Self::Vec3([x, y, z]) => write!(f, "{x}, {y}, {z}"),
            Self::Vec4([x, y, z, w]) => write!(f, "{x}, {y}, {z}, {w}"),
        }
    }
}
