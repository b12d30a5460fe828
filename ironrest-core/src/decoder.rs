//! Unmarshalling from the wire value model.
//!
//! This module provides the [`Unmarshal`] trait, the [`RequiredFields`]
//! descriptor that every generated record declares, and [`read_record`],
//! which drives per-key dispatch and the required-field check.

use crate::error::{CodecError, Result};
use crate::value::{Bytes, Value};
use crate::{json, ror2};
use indexmap::IndexMap;

/// Types that can be read back from a wire [`Value`].
pub trait Unmarshal: Sized {
    /// Reads an instance from its wire representation.
    ///
    /// # Errors
    /// Returns `CodecError` if the value has the wrong shape, a required field
    /// is missing, or a nested value is invalid.
    fn unmarshal(value: &Value) -> Result<Self>;
}

impl Unmarshal for bool {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_bool()
    }
}

impl Unmarshal for i32 {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_i32()
    }
}

impl Unmarshal for i64 {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_i64()
    }
}

impl Unmarshal for f32 {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_f32()
    }
}

impl Unmarshal for f64 {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_f64()
    }
}

impl Unmarshal for String {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_str().map(str::to_string)
    }
}

impl Unmarshal for Bytes {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_bytes()
    }
}

impl Unmarshal for Value {
    fn unmarshal(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: Unmarshal> Unmarshal for Box<T> {
    fn unmarshal(value: &Value) -> Result<Self> {
        T::unmarshal(value).map(Box::new)
    }
}

impl<T: Unmarshal> Unmarshal for Vec<T> {
    fn unmarshal(value: &Value) -> Result<Self> {
        value
            .as_array()?
            .iter()
            .enumerate()
            .map(|(i, item)| T::unmarshal(item).map_err(|e| e.in_field(format!("[{i}]"))))
            .collect()
    }
}

impl<T: Unmarshal> Unmarshal for IndexMap<String, T> {
    fn unmarshal(value: &Value) -> Result<Self> {
        let entries = value.as_map()?;
        let mut map = IndexMap::with_capacity(entries.len());
        for (key, item) in entries {
            let item = T::unmarshal(item).map_err(|e| e.in_field(key.as_str()))?;
            map.insert(key.clone(), item);
        }
        Ok(map)
    }
}

/// The required fields of a record type.
///
/// Generated code declares one of these as a `const` per record.
#[derive(Debug, Clone, Copy)]
pub struct RequiredFields {
    record: &'static str,
    fields: &'static [&'static str],
}

impl RequiredFields {
    /// Creates a required-field descriptor.
    ///
    /// # Arguments
    /// * `record` - Full name of the record type, used in errors
    /// * `fields` - Required field names in declaration order
    #[must_use]
    pub const fn new(record: &'static str, fields: &'static [&'static str]) -> Self {
        Self { record, fields }
    }

    /// Returns the record type name.
    #[must_use]
    pub const fn record(&self) -> &'static str {
        self.record
    }

    /// Returns the required field names.
    #[must_use]
    pub const fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    fn missing(&self, fields: Vec<String>) -> CodecError {
        CodecError::MissingRequiredFields {
            record: self.record.to_string(),
            fields,
        }
    }

    /// Unwraps a required field that [`read_record`] has already checked.
    ///
    /// # Errors
    /// Returns `CodecError::MissingRequiredFields` if the field is absent.
    pub fn take<T>(&self, value: Option<T>, field: &str) -> Result<T> {
        value.ok_or_else(|| self.missing(vec![field.to_string()]))
    }
}

/// Reads a keyed structure, dispatching every key to `read_field`.
///
/// `read_field` returns `Ok(true)` when it recognized the key and `Ok(false)`
/// otherwise; unrecognized keys are skipped without error. Once all keys are
/// consumed, any required field that was not recognized fails the read with
/// an error naming every missing field.
///
/// # Errors
/// Returns `CodecError` if the value is not a map, a field fails to decode,
/// or required fields are missing.
pub fn read_record<F>(value: &Value, required: &RequiredFields, mut read_field: F) -> Result<()>
where
    F: FnMut(&str, &Value) -> Result<bool>,
{
    let entries = value.as_map()?;
    let mut found = vec![false; required.fields.len()];

    for (key, item) in entries {
        let recognized = read_field(key, item).map_err(|e| e.in_field(key.as_str()))?;
        if recognized {
            if let Some(index) = required.fields.iter().position(|f| f == key) {
                found[index] = true;
            }
        }
    }

    let missing: Vec<String> = required
        .fields
        .iter()
        .zip(&found)
        .filter(|(_, found)| !**found)
        .map(|(field, _)| (*field).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(required.missing(missing))
    }
}

/// Unmarshals a value from compact JSON.
///
/// # Errors
/// Returns `CodecError` if the text is malformed or the value is invalid.
pub fn from_json<T: Unmarshal>(text: &str) -> Result<T> {
    T::unmarshal(&json::decode(text)?)
}

/// Unmarshals a value from the URL-safe form.
///
/// # Errors
/// Returns `CodecError` if the text is malformed or the value is invalid.
pub fn from_ror2<T: Unmarshal>(text: &str) -> Result<T> {
    T::unmarshal(&ror2::decode(text)?)
}
