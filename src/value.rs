//! Runtime values produced and consumed by the interpreter.

pub mod interval;

pub use interval::TemporalInterval;

use crate::error::{EvaluationError, EvaluationResult};
use chrono::NaiveTime;
use serde_json::{Map, Number};
use std::collections::BTreeMap;
use std::fmt;

/// Format used for TIME values in JSON documents.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Values flowing through an evaluation.
///
/// `Null` is the "no value" outcome of three-valued logic. It is distinct from
/// `Boolean(false)` and from an empty collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Numeric(f64),
    String(String),
    Time(NaiveTime),
    Interval(TemporalInterval),
    Collection(Vec<Value>),
    /// Host object with named fields
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value's representation, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(_) => "BOOLEAN",
            Value::Integer(_) => "INTEGER",
            Value::Numeric(_) => "NUMERIC",
            Value::String(_) => "STRING",
            Value::Time(_) => "TIME",
            Value::Interval(_) => "INTERVAL",
            Value::Collection(_) => "COLLECTION",
            Value::Object(_) => "OBJECT",
        }
    }

    /// Interpret the value as a three-valued boolean.
    pub fn as_truth(&self) -> EvaluationResult<Option<bool>> {
        match self {
            Value::Null => Ok(None),
            Value::Boolean(b) => Ok(Some(*b)),
            other => Err(EvaluationError::NotABoolean {
                actual: other.kind_name(),
            }),
        }
    }

    /// Build an object value from `(field, value)` pairs.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert into a JSON value for display or transport.
    ///
    /// JSON has no NaN or infinity, so such numbers become the strings
    /// `"NaN"`, `"inf"` and `"-inf"` rather than `null`, which means no value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Numeric(n) => Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(n.to_string())),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Time(t) => serde_json::Value::String(t.format(TIME_FORMAT).to_string()),
            Value::Interval(i) => serde_json::Value::String(i.to_string()),
            Value::Collection(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Numeric(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Value::Interval(i) => write!(f, "INTERVAL {}", i),
            Value::Collection(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// JSON numbers become `Integer` when they fit an `i64`, `Numeric` otherwise.
/// Strings stay strings; TIME values are produced by type adapters or
/// document literals, not guessed from text.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Numeric(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Collection(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Numeric(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<TemporalInterval> for Value {
    fn from(i: TemporalInterval) -> Self {
        Value::Interval(i)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

fn conversion_error(expected: &'static str, actual: &Value) -> EvaluationError {
    EvaluationError::Conversion {
        expected,
        actual: actual.kind_name(),
    }
}

impl TryFrom<Value> for bool {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(conversion_error("BOOLEAN", &other)),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(conversion_error("INTEGER", &other)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Numeric(n) => Ok(n),
            Value::Integer(i) => Ok(i as f64),
            other => Err(conversion_error("NUMERIC", &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(conversion_error("STRING", &other)),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Collection(items) => Ok(items),
            other => Err(conversion_error("COLLECTION", &other)),
        }
    }
}
