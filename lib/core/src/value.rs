use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::key::Key;

/// A single cell value
///
/// Deserializes from plain JSON: `null`, booleans, integers, floats, strings
/// and arrays of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Vector(Vec<f64>),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_vector(&self) -> bool {
        matches!(self, Value::Vector(_))
    }

    /// Coerce to a number
    ///
    /// Text is trimmed and parsed. Returns `Ok(None)` for nulls and
    /// `Err` with a reason when the value has no numeric reading.
    pub fn to_number(&self) -> Result<Option<f64>, String> {
        match self {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            Value::Int(i) => Ok(Some(*i as f64)),
            Value::Float(f) => Ok(Some(*f)),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| format!("'{}' is not numeric", s))
            }
            Value::Vector(_) => Err("vector value where a scalar was expected".to_string()),
        }
    }

    /// Text rendering used by string matching; `None` for nulls
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Read a value as a list of floats
    ///
    /// Native vectors are returned as-is; text is parsed as a comma separated
    /// list, optionally wrapped in brackets.
    pub fn to_float_list(&self) -> Result<Option<Cow<'_, [f64]>>, String> {
        match self {
            Value::Null => Ok(None),
            Value::Vector(v) => Ok(Some(Cow::Borrowed(v.as_slice()))),
            Value::Text(s) => parse_float_list(s).map(|v| Some(Cow::Owned(v))),
            Value::Int(i) => Ok(Some(Cow::Owned(vec![*i as f64]))),
            Value::Float(f) => Ok(Some(Cow::Owned(vec![*f]))),
            Value::Bool(_) => Err("boolean value where a vector was expected".to_string()),
        }
    }

    /// Hashable key for exact-equality joins; `None` for nulls and NaN
    pub fn to_key(&self) -> Option<Key> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(Key::Bool(*b)),
            Value::Int(i) => Key::number(*i as f64),
            Value::Float(f) => Key::number(*f),
            Value::Text(s) => Some(Key::Text(s.clone())),
            Value::Vector(v) => Key::vector(v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Vector(v) => {
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", x)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Parse `"1.5, 2, 3"` or `"[1.5,2,3]"` into floats
pub fn parse_float_list(s: &str) -> Result<Vec<f64>, String> {
    let inner = s
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", token))
        })
        .collect()
}
