//! Primitive attribute values.
//!
//! Every entity attribute the engine touches is one of these three shapes.
//! The untagged serde form lets TOML definition files write attribute values
//! naturally (`engaged = 5`, `value = 1.0`, `engaged = true`).

use serde::{Deserialize, Serialize};

/// A single attribute value: boolean, integer, or float.
///
/// Variant order matters for untagged deserialization: integers must be
/// tried before floats so that `5` parses as `Int(5)`, not `Float(5.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl AttrValue {
    /// Numeric view of the value. `Bool` has no numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Bool(_) => None,
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
        }
    }

    /// Integer view of the value, if it is an `Int`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean view of the value, if it is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Shift a numeric value by a signed delta.
    ///
    /// `Int` values move by the truncated delta, saturating at the `i64`
    /// rails instead of wrapping. Away from the rails the same delta
    /// applied and then negated returns to the starting value. `Bool`
    /// values are left untouched.
    ///
    /// # Examples
    /// ```
    /// use sigil_types::AttrValue;
    /// assert_eq!(AttrValue::Int(100).offset(50.0), AttrValue::Int(150));
    /// assert_eq!(AttrValue::Int(100).offset(2.5), AttrValue::Int(102));
    /// assert_eq!(AttrValue::Int(102).offset(-2.5), AttrValue::Int(100));
    /// assert_eq!(AttrValue::Int(100).offset(1.0e19), AttrValue::Int(i64::MAX));
    /// assert_eq!(AttrValue::Float(1.0).offset(0.5), AttrValue::Float(1.5));
    /// assert_eq!(AttrValue::Bool(true).offset(5.0), AttrValue::Bool(true));
    /// ```
    pub fn offset(self, delta: f64) -> AttrValue {
        match self {
            AttrValue::Bool(v) => AttrValue::Bool(v),
            AttrValue::Int(v) => AttrValue::Int(v.saturating_add(delta as i64)),
            AttrValue::Float(v) => AttrValue::Float(v + delta),
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}
