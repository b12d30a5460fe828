//! Schema-less records and patches.
//!
//! [`RawRecord`] stands in for records whose schema is not known at build
//! time; [`RawPartialUpdate`] is the matching patch, keyed by field name.

use crate::decoder::{Unmarshal, read_record};
use crate::encoder::{Marshal, RecordWriter};
use crate::error::Result;
use crate::hash::{ComputeHash, Hash};
use crate::patch::{
    DELETE_FIELD, PATCH_SECTIONS_REQUIRED_FIELDS, PartialUpdate, PatchFieldChecker, SET_FIELD,
    read_delete_fields,
};
use crate::value::Value;
use indexmap::{IndexMap, IndexSet};

const RAW_RECORD: &str = "RawRecord";

/// A record held as its raw keyed structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord(pub IndexMap<String, Value>);

impl ComputeHash for RawRecord {
    fn compute_hash(&self) -> Hash {
        self.0.compute_hash()
    }
}

impl Marshal for RawRecord {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Map(self.0.clone()))
    }
}

impl Unmarshal for RawRecord {
    fn unmarshal(value: &Value) -> Result<Self> {
        value.as_map().map(|entries| Self(entries.clone()))
    }
}

/// A patch on a [`RawRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPartialUpdate {
    /// Fields to remove.
    pub delete: IndexSet<String>,
    /// Fields to replace.
    pub set: IndexMap<String, Value>,
}

impl RawPartialUpdate {
    /// Creates an empty (no-op) patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the patch neither deletes nor sets anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.set.is_empty()
    }

    fn check_fields(&self) -> Result<PatchFieldChecker> {
        let mut checker = PatchFieldChecker::new(RAW_RECORD);
        for field in &self.delete {
            checker.check_field(field, true, self.set.contains_key(field))?;
        }
        for field in self.set.keys() {
            checker.check_field(field, false, true)?;
        }
        Ok(checker)
    }

    /// Applies the patch to a record.
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` if the patch is invalid.
    pub fn apply(&self, record: &mut RawRecord) -> Result<()> {
        self.check_fields()?;
        for field in &self.delete {
            record.0.shift_remove(field);
        }
        for (field, value) in &self.set {
            record.0.insert(field.clone(), value.clone());
        }
        Ok(())
    }
}

impl PartialUpdate for RawPartialUpdate {
    fn marshal_patch(&self) -> Result<Value> {
        let checker = self.check_fields()?;
        let mut writer = RecordWriter::new();
        if checker.has_deletes() {
            let deleted = self.delete.iter().cloned().map(Value::String).collect();
            writer.raw_field(DELETE_FIELD, Value::Array(deleted));
        }
        if checker.has_sets() {
            writer.raw_field(SET_FIELD, Value::Map(self.set.clone()));
        }
        Ok(writer.finish())
    }

    fn unmarshal_patch(value: &Value) -> Result<Self> {
        let mut patch = Self::new();
        read_record(value, &PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {
            match field {
                DELETE_FIELD => {
                    patch.delete = read_delete_fields(value)?
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                }
                SET_FIELD => patch.set = value.as_map()?.clone(),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        patch.check_fields()?;
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::json;
    use crate::patch::{marshal_partial_update, unmarshal_partial_update};

    #[test]
    fn test_empty_patch_round_trip() {
        let patch = RawPartialUpdate::new();
        let value = marshal_partial_update(&patch).expect("Failed to marshal");
        assert_eq!(json::encode(&value).unwrap(), r#"{"patch":{}}"#);

        let decoded: RawPartialUpdate = unmarshal_partial_update(&value).expect("Failed to read");
        assert!(decoded.is_empty());
        assert_eq!(decoded, patch);
    }

    #[test]
    fn test_patch_sections() {
        let mut patch = RawPartialUpdate::new();
        patch.delete.insert("old".to_string());
        patch.set.insert("name".to_string(), Value::from("n"));
        let value = marshal_partial_update(&patch).unwrap();
        assert_eq!(
            json::encode(&value).unwrap(),
            r#"{"patch":{"$delete":["old"],"$set":{"name":"n"}}}"#
        );
        let decoded: RawPartialUpdate = unmarshal_partial_update(&value).unwrap();
        assert_eq!(decoded, patch);
    }

    #[test]
    fn test_conflicting_patch_fails_both_ways() {
        let mut patch = RawPartialUpdate::new();
        patch.delete.insert("x".to_string());
        patch.set.insert("x".to_string(), Value::Int(1));
        let err = marshal_partial_update(&patch).unwrap_err();
        assert!(matches!(err, CodecError::PatchConflict { ref field, .. } if field == "x"));

        let value = json::decode(r#"{"patch":{"$delete":["x"],"$set":{"x":1}}}"#).unwrap();
        let err = unmarshal_partial_update::<RawPartialUpdate>(&value).unwrap_err();
        assert!(matches!(err.root_cause(), CodecError::PatchConflict { field, .. } if field == "x"));
    }

    #[test]
    fn test_missing_envelope() {
        let value = json::decode(r#"{"$set":{}}"#).unwrap();
        let err = unmarshal_partial_update::<RawPartialUpdate>(&value).unwrap_err();
        assert!(matches!(err, CodecError::MissingRequiredFields { .. }));
    }

    #[test]
    fn test_apply() {
        let mut record: RawRecord = crate::decoder::from_json(r#"{"a":1,"b":2}"#).unwrap();
        let mut patch = RawPartialUpdate::new();
        patch.delete.insert("a".to_string());
        patch.set.insert("c".to_string(), Value::Int(3));
        patch.apply(&mut record).unwrap();
        assert_eq!(json::encode(&record.marshal().unwrap()).unwrap(), r#"{"b":2,"c":3}"#);
    }
}
