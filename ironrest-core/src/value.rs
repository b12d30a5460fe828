//! Wire value model.
//!
//! Every generated type marshals into a [`Value`] tree, which the text forms in
//! [`crate::json`] and [`crate::ror2`] then render. Records are maps whose keys
//! are the present fields only; an absent field has no key at all.

use crate::error::{CodecError, Result};
use indexmap::IndexMap;
use std::ops::Deref;

/// A decoded or to-be-encoded wire value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Bytes(Bytes),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Keyed structure, iterated in insertion order.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Returns a short name of the value kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Creates an empty map value.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(IndexMap::new())
    }

    fn unexpected(&self, expected: &'static str) -> CodecError {
        CodecError::UnexpectedType {
            expected,
            actual: self.kind(),
        }
    }

    /// Reads a boolean. The URL-safe form carries scalars as strings, so
    /// `"true"` and `"false"` are accepted too.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not a boolean.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::String(s) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(CodecError::invalid(format!("'{s}' is not a boolean"))),
            },
            other => Err(other.unexpected("boolean")),
        }
    }

    /// Reads a 64-bit integer.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not an integral number.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Self::Int(i) => Ok(i64::from(*i)),
            Self::Long(l) => Ok(*l),
            Self::Double(d) if d.fract() == 0.0 && d.abs() < 9.007_199_254_740_992e15 => {
                Ok(*d as i64)
            }
            Self::String(s) => s
                .parse()
                .map_err(|_| CodecError::invalid(format!("'{s}' is not an integer"))),
            other => Err(other.unexpected("long")),
        }
    }

    /// Reads a 32-bit integer.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not an integer or is out of range.
    pub fn as_i32(&self) -> Result<i32> {
        let long = self.as_i64()?;
        i32::try_from(long).map_err(|_| CodecError::invalid(format!("{long} overflows int")))
    }

    /// Reads a 64-bit float.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not numeric.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Self::Int(i) => Ok(f64::from(*i)),
            Self::Long(l) => Ok(*l as f64),
            Self::Float(f) => Ok(f64::from(*f)),
            Self::Double(d) => Ok(*d),
            Self::String(s) => s
                .parse()
                .map_err(|_| CodecError::invalid(format!("'{s}' is not a number"))),
            other => Err(other.unexpected("double")),
        }
    }

    /// Reads a 32-bit float.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not numeric.
    pub fn as_f32(&self) -> Result<f32> {
        match self {
            Self::Float(f) => Ok(*f),
            other => other.as_f64().map(|d| d as f32),
        }
    }

    /// Reads a string.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not a string.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.unexpected("string")),
        }
    }

    /// Reads raw bytes, accepting the string form used on the wire.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is neither bytes nor a byte string.
    pub fn as_bytes(&self) -> Result<Bytes> {
        match self {
            Self::Bytes(b) => Ok(b.clone()),
            Self::String(s) => Bytes::from_wire_string(s),
            other => Err(other.unexpected("bytes")),
        }
    }

    /// Reads an array.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not an array.
    pub fn as_array(&self) -> Result<&[Value]> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(other.unexpected("array")),
        }
    }

    /// Reads a keyed structure.
    ///
    /// # Errors
    /// Returns `CodecError` if the value is not a map.
    pub fn as_map(&self) -> Result<&IndexMap<String, Value>> {
        match self {
            Self::Map(entries) => Ok(entries),
            other => Err(other.unexpected("map")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Owned byte string.
///
/// On the wire, bytes travel as a string in which every character is a code
/// point in `0..=255` standing for one byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Creates a byte string from anything convertible into a byte vector.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Renders the bytes in their wire string form.
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        self.0.iter().map(|&b| char::from(b)).collect()
    }

    /// Parses the wire string form.
    ///
    /// # Errors
    /// Returns `CodecError` if a character is outside `0..=255`.
    pub fn from_wire_string(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| {
                u8::try_from(u32::from(c)).map_err(|_| {
                    CodecError::invalid(format!("character {c:?} is not a valid byte"))
                })
            })
            .collect::<Result<Vec<u8>>>()
            .map(Self)
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}
