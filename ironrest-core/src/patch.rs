//! Partial-update (patch) contract.
//!
//! A patch on a record carries two sections: a list of field names to
//! delete and a map of fields to set. A field may appear in at most one of
//! them; [`PatchFieldChecker`] enforces this when a patch is marshalled and
//! again after it is unmarshalled.
//!
//! Wire shape:
//! ```text
//! {"patch": {"$delete": ["a", "b"], "$set": {"c": 1}}}
//! ```
//! Empty sections are omitted, so a no-op patch is `{"patch":{}}`.

use crate::decoder::{RequiredFields, read_record};
use crate::encoder::RecordWriter;
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Key of the envelope that wraps the patch sections.
pub const PATCH_FIELD: &str = "patch";
/// Key of the delete section.
pub const DELETE_FIELD: &str = "$delete";
/// Key of the set section.
pub const SET_FIELD: &str = "$set";

/// Required fields of the patch envelope.
pub const PATCH_REQUIRED_FIELDS: RequiredFields = RequiredFields::new("patch", &[PATCH_FIELD]);

/// Required fields of the inner `{"$delete": .., "$set": ..}` object; both
/// sections are optional.
pub const PATCH_SECTIONS_REQUIRED_FIELDS: RequiredFields = RequiredFields::new("patch", &[]);

/// Validates the delete/set exclusivity of a patch, field by field.
#[derive(Debug, Clone)]
pub struct PatchFieldChecker {
    record: &'static str,
    has_deletes: bool,
    has_sets: bool,
}

impl PatchFieldChecker {
    /// Creates a checker for the given record type.
    #[must_use]
    pub const fn new(record: &'static str) -> Self {
        Self {
            record,
            has_deletes: false,
            has_sets: false,
        }
    }

    /// Checks a single field.
    ///
    /// # Arguments
    /// * `field` - Field name
    /// * `is_deleted` - Whether the field is in the delete section
    /// * `is_set` - Whether the field is in the set section
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` if the field is in both sections.
    pub fn check_field(&mut self, field: &str, is_deleted: bool, is_set: bool) -> Result<()> {
        if is_deleted && is_set {
            return Err(CodecError::patch_conflict(self.record, field));
        }
        self.has_deletes |= is_deleted;
        self.has_sets |= is_set;
        Ok(())
    }

    /// Returns true if any checked field is deleted.
    #[must_use]
    pub const fn has_deletes(&self) -> bool {
        self.has_deletes
    }

    /// Returns true if any checked field is set.
    #[must_use]
    pub const fn has_sets(&self) -> bool {
        self.has_sets
    }

    /// Returns the record type name.
    #[must_use]
    pub const fn record(&self) -> &'static str {
        self.record
    }
}

/// A partial update on a record type.
///
/// Implementations marshal only the inner `{"$delete": .., "$set": ..}`
/// object; [`marshal_partial_update`] adds the envelope.
pub trait PartialUpdate: Sized {
    /// Marshals the delete and set sections.
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` if a field is both deleted and set.
    fn marshal_patch(&self) -> Result<Value>;

    /// Unmarshals the delete and set sections, then validates exclusivity.
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` if a field is both deleted and set,
    /// or any other `CodecError` if a section is malformed.
    fn unmarshal_patch(value: &Value) -> Result<Self>;
}

/// Marshals a patch inside its `{"patch": ..}` envelope.
///
/// # Errors
/// Returns `CodecError` if the patch is invalid.
pub fn marshal_partial_update<P: PartialUpdate>(patch: &P) -> Result<Value> {
    let mut writer = RecordWriter::new();
    writer.raw_field(PATCH_FIELD, patch.marshal_patch()?);
    Ok(writer.finish())
}

/// Unmarshals a patch from its `{"patch": ..}` envelope.
///
/// Keys other than `patch` are ignored.
///
/// # Errors
/// Returns `CodecError` if the envelope is missing or the patch is invalid.
pub fn unmarshal_partial_update<P: PartialUpdate>(value: &Value) -> Result<P> {
    let mut patch = None;
    read_record(value, &PATCH_REQUIRED_FIELDS, |field, value| {
        if field == PATCH_FIELD {
            patch = Some(P::unmarshal_patch(value)?);
            Ok(true)
        } else {
            Ok(false)
        }
    })?;
    PATCH_REQUIRED_FIELDS.take(patch, PATCH_FIELD)
}

/// Reads the names listed in a delete section.
///
/// # Errors
/// Returns `CodecError` if the section is not an array of strings.
pub fn read_delete_fields(value: &Value) -> Result<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_tracks_sections() {
        let mut checker = PatchFieldChecker::new("com.example.Greeting");
        checker.check_field("a", true, false).unwrap();
        checker.check_field("b", false, false).unwrap();
        assert!(checker.has_deletes());
        assert!(!checker.has_sets());
        checker.check_field("c", false, true).unwrap();
        assert!(checker.has_sets());
    }

    #[test]
    fn test_checker_rejects_conflict() {
        let mut checker = PatchFieldChecker::new("com.example.Greeting");
        let err = checker.check_field("message", true, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'message' of 'com.example.Greeting' cannot be both deleted and set in the same patch"
        );
    }

    #[test]
    fn test_read_delete_fields() {
        let value = Value::Array(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(read_delete_fields(&value).unwrap(), ["a", "b"]);
        assert!(read_delete_fields(&Value::Array(vec![Value::Int(1)])).is_err());
    }
}
