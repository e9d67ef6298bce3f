//! Types module: runtime value types and filter operands.
//!
//! This module provides the ValueType and Value enums carried by typed expression leaves,
//! and the Scalar enum used as the operand of every emitted filter clause.

use std::collections::HashMap;
use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ValueType {
    Null,
    Bool,
    Int,
    Number,
    String,
    Time,
    Strings,
    Map,
    #[default]
    Unknown,
}

/// A runtime value as produced by the expression layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Number(f64),
    String(String),
    Time(DateTime<Utc>),
    Strings(Vec<String>),
    Map(HashMap<String, Value>),
}

impl ValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Number)
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Time(_) => ValueType::Time,
            Value::Strings(_) => ValueType::Strings,
            Value::Map(_) => ValueType::Map,
        }
    }

    /// Float accessor, only exposed by number values.
    pub fn float(&self) -> Option<f64> {
        match self {
            Value::Number(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Time(t) => f.write_str(&t.to_rfc3339()),
            Value::Strings(v) => f.write_str(&v.join(",")),
            Value::Map(m) => {
                let mut keys: Vec<_> = m.keys().collect();
                keys.sort();
                let parts: Vec<String> = keys.iter().map(|k| format!("{}={}", k, m[*k])).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

/// Operand of a filter clause. Serializes as a bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Parses the boolean literal spellings accepted by the query language:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parses a float, rejecting NaN and infinities which have no JSON encoding.
pub(crate) fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}
