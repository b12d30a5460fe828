//! Marshalling into the wire value model.
//!
//! This module provides the [`Marshal`] trait and the [`RecordWriter`] that
//! generated records use to emit their present fields.

use crate::error::Result;
use crate::value::{Bytes, Value};
use crate::{json, ror2};
use indexmap::IndexMap;

/// Types that can be written as a wire [`Value`].
///
/// # Example
/// ```ignore
/// // Generated record usage
/// let annotation = ExtensionSchemaAnnotation { using: Some("get_all".into()), ..Default::default() };
/// let text = ironrest_core::to_json(&annotation)?;
/// ```
pub trait Marshal {
    /// Converts this value into its wire representation.
    ///
    /// # Errors
    /// Returns `CodecError` if a nested value fails validation (for example a
    /// patch that both deletes and sets a field).
    fn marshal(&self) -> Result<Value>;
}

impl Marshal for bool {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Bool(*self))
    }
}

impl Marshal for i32 {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Int(*self))
    }
}

impl Marshal for i64 {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Long(*self))
    }
}

impl Marshal for f32 {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Float(*self))
    }
}

impl Marshal for f64 {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Double(*self))
    }
}

impl Marshal for String {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl Marshal for Bytes {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Bytes(self.clone()))
    }
}

impl Marshal for Value {
    fn marshal(&self) -> Result<Value> {
        Ok(self.clone())
    }
}

impl<T: Marshal + ?Sized> Marshal for Box<T> {
    fn marshal(&self) -> Result<Value> {
        (**self).marshal()
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn marshal(&self) -> Result<Value> {
        self.iter()
            .map(Marshal::marshal)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<T: Marshal> Marshal for IndexMap<String, T> {
    fn marshal(&self) -> Result<Value> {
        let mut entries = IndexMap::with_capacity(self.len());
        for (key, value) in self {
            entries.insert(key.clone(), value.marshal()?);
        }
        Ok(Value::Map(entries))
    }
}

/// Builder for a record's keyed structure.
///
/// Absent optional fields are skipped entirely rather than written as null.
#[derive(Debug, Default)]
pub struct RecordWriter {
    entries: IndexMap<String, Value>,
}

impl RecordWriter {
    /// Creates an empty record writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a field that is always present.
    ///
    /// # Errors
    /// Returns `CodecError` if the value fails to marshal.
    pub fn field<T: Marshal + ?Sized>(&mut self, name: &str, value: &T) -> Result<&mut Self> {
        let value = value
            .marshal()
            .map_err(|e| e.in_field(name))?;
        self.entries.insert(name.to_string(), value);
        Ok(self)
    }

    /// Writes a field only when it is present.
    ///
    /// # Errors
    /// Returns `CodecError` if the value fails to marshal.
    pub fn optional_field<T: Marshal>(
        &mut self,
        name: &str,
        value: &Option<T>,
    ) -> Result<&mut Self> {
        match value {
            Some(value) => self.field(name, value),
            None => Ok(self),
        }
    }

    /// Writes an already marshalled value.
    pub fn raw_field(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }

    /// Returns true if no field has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the writer and returns the record value.
    #[must_use]
    pub fn finish(self) -> Value {
        Value::Map(self.entries)
    }
}

/// Marshals a value to compact JSON.
///
/// # Errors
/// Returns `CodecError` if marshalling or rendering fails.
pub fn to_json<T: Marshal + ?Sized>(value: &T) -> Result<String> {
    json::encode(&value.marshal()?)
}

/// Marshals a value to the URL-safe form.
///
/// # Errors
/// Returns `CodecError` if marshalling fails.
pub fn to_ror2<T: Marshal + ?Sized>(value: &T) -> Result<String> {
    Ok(ror2::encode(&value.marshal()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_writer_omits_absent_fields() {
        let present = Some("x".to_string());
        let absent: Option<String> = None;
        let mut writer = RecordWriter::new();
        writer
            .optional_field("present", &present)
            .unwrap()
            .optional_field("absent", &absent)
            .unwrap()
            .field("count", &3i32)
            .unwrap();
        let value = writer.finish();
        assert_eq!(json::encode(&value).unwrap(), r#"{"present":"x","count":3}"#);
    }

    #[test]
    fn test_collections_keep_order() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), vec![3i64, 1]);
        map.insert("a".to_string(), vec![]);
        assert_eq!(to_json(&map).unwrap(), r#"{"b":[3,1],"a":[]}"#);
        assert_eq!(to_ror2(&map).unwrap(), "(b:List(3,1),a:List())");
    }

    #[test]
    fn test_empty_record() {
        assert!(RecordWriter::new().is_empty());
        assert_eq!(RecordWriter::new().finish(), Value::empty_map());
    }
}
