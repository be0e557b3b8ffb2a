//! Value model — kinds, equality and ordering over JSON values
//!
//! Patterns and data are both plain [`serde_json::Value`] trees. This module
//! defines how the engine compares them:
//!
//! - [`equals`]: structural equality (numbers compare numerically, objects
//!   as unordered member sets)
//! - [`compare`]: ordering for `>`, `>=`, `<`, `<=` and `__sort__`
//! - [`TypeName`]: the kind names accepted by the `is` operator
//!
//! # Equality models
//!
//! [`Equality::Strict`] keeps booleans a distinct kind. [`Equality::Loose`]
//! treats `true`/`false` as the integers `1`/`0` in equality and ordering.

use crate::MatchError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// The runtime kind of a JSON value.
///
/// Used in error messages and by [`TypeName::accepts`].
///
/// # Example
///
/// ```
/// use mqlite::ValueKind;
/// use serde_json::json;
///
/// assert_eq!(ValueKind::of(&json!(1)), ValueKind::Integer);
/// assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Float);
/// assert_eq!(ValueKind::of(&json!({})).to_string(), "object");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// A number without a fractional part or exponent.
    Integer,
    /// Any other number.
    Float,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl ValueKind {
    /// Returns the kind of `value`.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns the lowercase name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How booleans relate to numbers when comparing values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Equality {
    /// Booleans are their own kind: `true != 1`.
    #[default]
    Strict,
    /// Booleans coincide with `1`/`0`: `true == 1`, `false < 1`.
    Loose,
}

/// A kind name accepted by the `is` operator.
///
/// Both JSON-flavoured and short names are recognized:
///
/// | Name | Accepts |
/// |------|---------|
/// | `null`, `none` | `null` |
/// | `boolean`, `bool` | `true`, `false` |
/// | `integer`, `int` | integral numbers |
/// | `float` | non-integral numbers |
/// | `number` | any number |
/// | `string`, `str` | strings |
/// | `array`, `list` | arrays |
/// | `object`, `dict` | objects |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Integral numbers.
    Integer,
    /// Non-integral numbers.
    Float,
    /// Any number.
    Number,
    /// Strings.
    String,
    /// Arrays.
    Array,
    /// Objects.
    Object,
}

impl TypeName {
    /// Parse a kind name, returning `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name {
            "null" | "none" => Self::Null,
            "boolean" | "bool" => Self::Boolean,
            "integer" | "int" => Self::Integer,
            "float" => Self::Float,
            "number" => Self::Number,
            "string" | "str" => Self::String,
            "array" | "list" => Self::Array,
            "object" | "dict" => Self::Object,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` if `value` belongs to this kind.
    ///
    /// Booleans are never integers here, whatever the [`Equality`] model.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        let kind = ValueKind::of(value);
        match self {
            Self::Null => kind == ValueKind::Null,
            Self::Boolean => kind == ValueKind::Boolean,
            Self::Integer => kind == ValueKind::Integer,
            Self::Float => kind == ValueKind::Float,
            Self::Number => matches!(kind, ValueKind::Integer | ValueKind::Float),
            Self::String => kind == ValueKind::String,
            Self::Array => kind == ValueKind::Array,
            Self::Object => kind == ValueKind::Object,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Numbers
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn from_number(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Int(i128::from(i))
        } else if let Some(u) = n.as_u64() {
            Self::Int(i128::from(u))
        } else {
            Self::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }

    #[allow(clippy::cast_precision_loss)] // mixed int/float comparison is inherently approximate
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn partial_cmp(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

fn numeric(value: &Value, equality: Equality) -> Option<Numeric> {
    match value {
        Value::Number(n) => Some(Numeric::from_number(n)),
        Value::Bool(b) if equality == Equality::Loose => Some(Numeric::Int(i128::from(*b))),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Equality and ordering
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural equality between two values.
///
/// - Numbers compare numerically: `1 == 1.0`.
/// - Arrays compare element-wise, in order.
/// - Objects compare as unordered sets of members.
/// - Values of different kinds are never equal, except booleans and numbers
///   under [`Equality::Loose`].
///
/// # Example
///
/// ```
/// use mqlite::{equals, Equality};
/// use serde_json::json;
///
/// assert!(equals(&json!(1), &json!(1.0), Equality::Strict));
/// assert!(!equals(&json!(true), &json!(1), Equality::Strict));
/// assert!(equals(&json!(true), &json!(1), Equality::Loose));
/// ```
#[must_use]
pub fn equals(left: &Value, right: &Value, equality: Equality) -> bool {
    if let (Some(a), Some(b)) = (numeric(left, equality), numeric(right, equality)) {
        return a.partial_cmp(b) == Some(Ordering::Equal);
    }

    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(x, y, equality))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| equals(x, y, equality)))
        }
        _ => false,
    }
}

/// Order two values.
///
/// - Numbers order numerically.
/// - Strings order lexicographically by code point.
/// - Booleans order `false < true`.
/// - Arrays order lexicographically: the first unequal pair decides, then length.
///
/// # Errors
///
/// Returns [`MatchError::Incomparable`] for any other pairing (null, objects,
/// or values of different kinds).
///
/// # Example
///
/// ```
/// use mqlite::{compare, Equality};
/// use serde_json::json;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare(&json!(2), &json!(10), Equality::Strict), Ok(Ordering::Less));
/// assert_eq!(compare(&json!("b"), &json!("a"), Equality::Strict), Ok(Ordering::Greater));
/// assert!(compare(&json!("1"), &json!(1), Equality::Strict).is_err());
/// ```
pub fn compare(left: &Value, right: &Value, equality: Equality) -> Result<Ordering, MatchError> {
    let incomparable = || MatchError::Incomparable {
        left: ValueKind::of(left),
        right: ValueKind::of(right),
    };

    if let (Some(a), Some(b)) = (numeric(left, equality), numeric(right, equality)) {
        return a.partial_cmp(b).ok_or_else(incomparable);
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                if !equals(x, y, equality) {
                    return compare(x, y, equality);
                }
            }
            Ok(a.len().cmp(&b.len()))
        }
        _ => Err(incomparable()),
    }
}
