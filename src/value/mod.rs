//! Column value model for livequery
//!
//! Every column resolves to exactly one `Value`. The set of kinds is fixed:
//! integers, floats, strings, string lists, timestamps, and an explicit
//! `Absent` variant for data that cannot be resolved under the current
//! snapshot.
//!
//! Comparison rules are strict:
//! - No cross-kind coercion except the numeric Int/Float mix and
//!   Time-vs-integer (unix seconds).
//! - `Absent` fails every positive comparison; only negative (not-equals)
//!   matches treat it as unequal to everything.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The kind of value a column produces.
///
/// Declared once per column at table construction; filter literals are
/// checked against it before any row is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    Str,
    /// Ordered list of strings
    StrList,
    /// Point in time; rendered relative to query time by the output layer
    Time,
}

impl ValueType {
    /// Returns the type name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "string",
            ValueType::StrList => "string_list",
            ValueType::Time => "time",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved column value.
///
/// `Absent` is a modeled value, not an error: accessors return it when an
/// entity handle no longer resolves under the snapshot, and comparisons
/// treat it per the rules documented on each method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
    Time(DateTime<Utc>),
    /// Data that could not be resolved for this row
    Absent,
}

impl Value {
    /// Returns the declared kind of this value, or `None` for `Absent`
    pub fn type_of(&self) -> Option<ValueType> {
        match self {
            Value::Int(_) => Some(ValueType::Int),
            Value::Float(_) => Some(ValueType::Float),
            Value::Str(_) => Some(ValueType::Str),
            Value::StrList(_) => Some(ValueType::StrList),
            Value::Time(_) => Some(ValueType::Time),
            Value::Absent => None,
        }
    }

    /// Returns true if this value is `Absent`
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Borrows the string payload, if this is a `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Strict equality with the numeric Int/Float mix and Time-vs-integer
    /// allowances.
    ///
    /// `Absent` is equal to nothing, including another `Absent`.
    pub fn eq_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::StrList(a), Value::StrList(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Time(t), Value::Int(secs)) | (Value::Int(secs), Value::Time(t)) => {
                t.timestamp() == *secs
            }
            _ => false,
        }
    }

    /// Ordering under the same allowances as [`eq_value`](Self::eq_value).
    ///
    /// Returns `None` for incomparable kinds and whenever either side is
    /// `Absent`, which makes every range operator fail on absent data.
    pub fn partial_cmp_value(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Time(t), Value::Int(secs)) => Some(t.timestamp().cmp(secs)),
            (Value::Int(secs), Value::Time(t)) => Some(secs.cmp(&t.timestamp())),
            _ => None,
        }
    }

    /// List membership: true iff this is a `StrList` containing `needle`
    pub fn contains_str(&self, needle: &str) -> bool {
        match self {
            Value::StrList(items) => items.iter().any(|item| item == needle),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StrList(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}
