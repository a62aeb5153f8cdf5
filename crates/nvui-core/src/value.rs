#![forbid(unsafe_code)]

//! The decoded message-pack value handed over by the protocol decoder.
//!
//! Wire decoding itself is an external collaborator; this type is the
//! boundary between it and the reconciliation engine. Maps are kept as pair
//! lists because protocol dictionaries are tiny and key order is sometimes
//! meaningful (option sets).

use std::fmt;

/// A decoded protocol value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Binary(Vec<u8>),
    Ext(ExtHandle),
}

/// An opaque remote-object handle (message-pack extension value).
///
/// Window, tabpage, and buffer ids arrive as these; the engine only ever
/// compares them for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtHandle {
    pub kind: i8,
    pub data: Vec<u8>,
}

impl ExtHandle {
    pub fn new(kind: i8, data: Vec<u8>) -> Self {
        Self { kind, data }
    }
}

impl Value {
    /// Interpret as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Interpret as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Interpret as a float. Integers coerce, since the protocol sends
    /// whole-number anchors as integers.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Interpret as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Interpret as an array.
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Interpret as a map (pair list).
    #[inline]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Interpret as an extension handle.
    #[inline]
    pub fn as_ext(&self) -> Option<&ExtHandle> {
        match self {
            Value::Ext(handle) => Some(handle),
            _ => None,
        }
    }

    /// Look up a string key in a map value.
    pub fn map_get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value:?}"),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Value::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::Ext(handle) => write!(f, "<ext {} ({} bytes)>", handle.kind, handle.data.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}
