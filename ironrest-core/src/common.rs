//! Common record types shipped with the runtime.
//!
//! These follow the shape `ironrest-codegen` emits for a record, with the
//! runtime's own paths in place of the `rt::` alias, so generated code can
//! depend on them directly.

use crate::decoder::{RequiredFields, Unmarshal, read_record};
use crate::encoder::{Marshal, RecordWriter};
use crate::error::Result;
use crate::hash::{ComputeHash, Hash};
use crate::patch::{
    DELETE_FIELD, PATCH_SECTIONS_REQUIRED_FIELDS, PartialUpdate, PatchFieldChecker, SET_FIELD,
    read_delete_fields,
};
use crate::value::Value;
use indexmap::IndexMap;

// ErrorDetails

/// Free-form error details attached to a service error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDetails {}

pub const ERROR_DETAILS_REQUIRED_FIELDS: RequiredFields =
    RequiredFields::new("com.linkedin.restli.common.ErrorDetails", &[]);

impl ComputeHash for ErrorDetails {
    fn compute_hash(&self) -> Hash {
        Hash::new()
    }
}

impl Marshal for ErrorDetails {
    fn marshal(&self) -> Result<Value> {
        Ok(RecordWriter::new().finish())
    }
}

impl Unmarshal for ErrorDetails {
    fn unmarshal(value: &Value) -> Result<Self> {
        read_record(value, &ERROR_DETAILS_REQUIRED_FIELDS, |_, _| Ok(false))?;
        Ok(Self {})
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDetailsPartialUpdateDeleteFields {}

impl Marshal for ErrorDetailsPartialUpdateDeleteFields {
    fn marshal(&self) -> Result<Value> {
        Ok(Value::Array(Vec::new()))
    }
}

impl Unmarshal for ErrorDetailsPartialUpdateDeleteFields {
    fn unmarshal(value: &Value) -> Result<Self> {
        read_delete_fields(value)?;
        Ok(Self {})
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDetailsPartialUpdateSetFields {}

impl Marshal for ErrorDetailsPartialUpdateSetFields {
    fn marshal(&self) -> Result<Value> {
        Ok(RecordWriter::new().finish())
    }
}

impl Unmarshal for ErrorDetailsPartialUpdateSetFields {
    fn unmarshal(value: &Value) -> Result<Self> {
        read_record(value, &PATCH_SECTIONS_REQUIRED_FIELDS, |_, _| Ok(false))?;
        Ok(Self {})
    }
}

/// A partial update on [`ErrorDetails`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDetailsPartialUpdate {
    pub delete_fields: ErrorDetailsPartialUpdateDeleteFields,
    pub set_fields: ErrorDetailsPartialUpdateSetFields,
}

impl ErrorDetailsPartialUpdate {
    /// Validates that no field is both deleted and set.
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` naming the first offending field.
    pub fn check_fields(&self) -> Result<PatchFieldChecker> {
        Ok(PatchFieldChecker::new(ERROR_DETAILS_REQUIRED_FIELDS.record()))
    }
}

impl PartialUpdate for ErrorDetailsPartialUpdate {
    fn marshal_patch(&self) -> Result<Value> {
        let checker = self.check_fields()?;
        let mut writer = RecordWriter::new();
        if checker.has_deletes() {
            writer.field(DELETE_FIELD, &self.delete_fields)?;
        }
        if checker.has_sets() {
            writer.field(SET_FIELD, &self.set_fields)?;
        }
        Ok(writer.finish())
    }

    fn unmarshal_patch(value: &Value) -> Result<Self> {
        let mut patch = Self::default();
        read_record(value, &PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {
            match field {
                DELETE_FIELD => patch.delete_fields = Unmarshal::unmarshal(value)?,
                SET_FIELD => patch.set_fields = Unmarshal::unmarshal(value)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        patch.check_fields()?;
        Ok(patch)
    }
}

// ExtensionSchemaAnnotation

/// Specifies the extension schema annotation configuration for defining the
/// entity relationship among entities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtensionSchemaAnnotation {
    /// Specifies only for one to many relationship. It can use either
    /// GET_ALL("get_all") or a FINDER("finder:<method name>").
    pub using: Option<String>,
    /// Specifies parameters if any of them are specified. It is also used for
    /// FINDER.
    pub params: Option<IndexMap<String, String>>,
    /// Specifies versionSuffix in multi-version scenario. If is is not
    /// provided, will pick first version by default.
    pub version_suffix: Option<String>,
}

pub const EXTENSION_SCHEMA_ANNOTATION_REQUIRED_FIELDS: RequiredFields =
    RequiredFields::new("com.linkedin.restli.common.ExtensionSchemaAnnotation", &[]);

impl ComputeHash for ExtensionSchemaAnnotation {
    fn compute_hash(&self) -> Hash {
        let mut hash = Hash::new();
        hash.add(&self.using);
        hash.add(&self.params);
        hash.add(&self.version_suffix);
        hash
    }
}

impl Marshal for ExtensionSchemaAnnotation {
    fn marshal(&self) -> Result<Value> {
        let mut writer = RecordWriter::new();
        writer.optional_field("params", &self.params)?;
        writer.optional_field("using", &self.using)?;
        writer.optional_field("versionSuffix", &self.version_suffix)?;
        Ok(writer.finish())
    }
}

impl Unmarshal for ExtensionSchemaAnnotation {
    fn unmarshal(value: &Value) -> Result<Self> {
        let mut using: Option<String> = None;
        let mut params: Option<IndexMap<String, String>> = None;
        let mut version_suffix: Option<String> = None;
        read_record(value, &EXTENSION_SCHEMA_ANNOTATION_REQUIRED_FIELDS, |field, value| {
            match field {
                "using" => using = Some(Unmarshal::unmarshal(value)?),
                "params" => params = Some(Unmarshal::unmarshal(value)?),
                "versionSuffix" => version_suffix = Some(Unmarshal::unmarshal(value)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Self {
            using,
            params,
            version_suffix,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtensionSchemaAnnotationPartialUpdateDeleteFields {
    pub using: bool,
    pub params: bool,
    pub version_suffix: bool,
}

impl Marshal for ExtensionSchemaAnnotationPartialUpdateDeleteFields {
    fn marshal(&self) -> Result<Value> {
        let mut fields = Vec::new();
        if self.params {
            fields.push(Value::from("params"));
        }
        if self.using {
            fields.push(Value::from("using"));
        }
        if self.version_suffix {
            fields.push(Value::from("versionSuffix"));
        }
        Ok(Value::Array(fields))
    }
}

impl Unmarshal for ExtensionSchemaAnnotationPartialUpdateDeleteFields {
    fn unmarshal(value: &Value) -> Result<Self> {
        let mut fields = Self::default();
        for field in read_delete_fields(value)? {
            match field {
                "using" => fields.using = true,
                "params" => fields.params = true,
                "versionSuffix" => fields.version_suffix = true,
                _ => {}
            }
        }
        Ok(fields)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtensionSchemaAnnotationPartialUpdateSetFields {
    pub using: Option<String>,
    pub params: Option<IndexMap<String, String>>,
    pub version_suffix: Option<String>,
}

impl Marshal for ExtensionSchemaAnnotationPartialUpdateSetFields {
    fn marshal(&self) -> Result<Value> {
        let mut writer = RecordWriter::new();
        writer.optional_field("params", &self.params)?;
        writer.optional_field("using", &self.using)?;
        writer.optional_field("versionSuffix", &self.version_suffix)?;
        Ok(writer.finish())
    }
}

impl Unmarshal for ExtensionSchemaAnnotationPartialUpdateSetFields {
    fn unmarshal(value: &Value) -> Result<Self> {
        let mut fields = Self::default();
        read_record(value, &PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {
            match field {
                "using" => fields.using = Some(Unmarshal::unmarshal(value)?),
                "params" => fields.params = Some(Unmarshal::unmarshal(value)?),
                "versionSuffix" => fields.version_suffix = Some(Unmarshal::unmarshal(value)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(fields)
    }
}

/// A partial update on [`ExtensionSchemaAnnotation`].
///
/// Flagging a field in `delete_fields` removes it; giving it a value in
/// `set_fields` replaces it. A field may not be both deleted and set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtensionSchemaAnnotationPartialUpdate {
    pub delete_fields: ExtensionSchemaAnnotationPartialUpdateDeleteFields,
    pub set_fields: ExtensionSchemaAnnotationPartialUpdateSetFields,
}

impl ExtensionSchemaAnnotationPartialUpdate {
    /// Validates that no field is both deleted and set.
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` naming the first offending field.
    pub fn check_fields(&self) -> Result<PatchFieldChecker> {
        let mut checker =
            PatchFieldChecker::new(EXTENSION_SCHEMA_ANNOTATION_REQUIRED_FIELDS.record());
        checker.check_field("using", self.delete_fields.using, self.set_fields.using.is_some())?;
        checker.check_field("params", self.delete_fields.params, self.set_fields.params.is_some())?;
        checker.check_field(
            "versionSuffix",
            self.delete_fields.version_suffix,
            self.set_fields.version_suffix.is_some(),
        )?;
        Ok(checker)
    }
}

impl PartialUpdate for ExtensionSchemaAnnotationPartialUpdate {
    fn marshal_patch(&self) -> Result<Value> {
        let checker = self.check_fields()?;
        let mut writer = RecordWriter::new();
        if checker.has_deletes() {
            writer.field(DELETE_FIELD, &self.delete_fields)?;
        }
        if checker.has_sets() {
            writer.field(SET_FIELD, &self.set_fields)?;
        }
        Ok(writer.finish())
    }

    fn unmarshal_patch(value: &Value) -> Result<Self> {
        let mut patch = Self::default();
        read_record(value, &PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {
            match field {
                DELETE_FIELD => patch.delete_fields = Unmarshal::unmarshal(value)?,
                SET_FIELD => patch.set_fields = Unmarshal::unmarshal(value)?,
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
    use crate::decoder::from_json;
    use crate::encoder::to_json;
    use crate::error::CodecError;
    use crate::json;
    use crate::patch::{marshal_partial_update, unmarshal_partial_update};

    fn annotation() -> ExtensionSchemaAnnotation {
        let mut params = IndexMap::new();
        params.insert("q".to_string(), "search".to_string());
        ExtensionSchemaAnnotation {
            using: Some("finder:search".to_string()),
            params: Some(params),
            version_suffix: None,
        }
    }

    #[test]
    fn test_marshal_sorts_fields_and_omits_absent() {
        let text = to_json(&annotation()).expect("Failed to marshal");
        assert_eq!(text, r#"{"params":{"q":"search"},"using":"finder:search"}"#);
    }

    #[test]
    fn test_round_trip_keeps_absent_fields_absent() {
        let original = annotation();
        let decoded: ExtensionSchemaAnnotation =
            from_json(&to_json(&original).unwrap()).expect("Failed to unmarshal");
        assert_eq!(decoded, original);
        assert!(decoded.version_suffix.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let decoded: ExtensionSchemaAnnotation =
            from_json(r#"{"somethingNew":[1,2],"using":"get_all"}"#).unwrap();
        assert_eq!(decoded.using.as_deref(), Some("get_all"));
        assert!(decoded.params.is_none());
    }

    #[test]
    fn test_equal_values_hash_equally() {
        assert_eq!(annotation().compute_hash(), annotation().compute_hash());
        let mut other = annotation();
        other.version_suffix = Some("v2".to_string());
        assert_ne!(other, annotation());
        assert_ne!(other.compute_hash(), annotation().compute_hash());
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(to_json(&ErrorDetails {}).unwrap(), "{}");
        let decoded: ErrorDetails = from_json(r#"{"anything":true}"#).unwrap();
        assert_eq!(decoded, ErrorDetails {});
    }

    #[test]
    fn test_empty_patch_round_trip() {
        let patch = ExtensionSchemaAnnotationPartialUpdate::default();
        let value = marshal_partial_update(&patch).unwrap();
        assert_eq!(json::encode(&value).unwrap(), r#"{"patch":{}}"#);
        let decoded: ExtensionSchemaAnnotationPartialUpdate =
            unmarshal_partial_update(&value).unwrap();
        assert_eq!(decoded, patch);

        let value = marshal_partial_update(&ErrorDetailsPartialUpdate::default()).unwrap();
        assert_eq!(json::encode(&value).unwrap(), r#"{"patch":{}}"#);
    }

    #[test]
    fn test_patch_round_trip() {
        let mut patch = ExtensionSchemaAnnotationPartialUpdate::default();
        patch.delete_fields.params = true;
        patch.set_fields.using = Some("get_all".to_string());
        let value = marshal_partial_update(&patch).unwrap();
        assert_eq!(
            json::encode(&value).unwrap(),
            r#"{"patch":{"$delete":["params"],"$set":{"using":"get_all"}}}"#
        );
        let decoded: ExtensionSchemaAnnotationPartialUpdate =
            unmarshal_partial_update(&value).unwrap();
        assert_eq!(decoded, patch);
    }

    #[test]
    fn test_patch_conflict_is_rejected() {
        let mut patch = ExtensionSchemaAnnotationPartialUpdate::default();
        patch.delete_fields.version_suffix = true;
        patch.set_fields.version_suffix = Some("v1".to_string());
        let err = marshal_partial_update(&patch).unwrap_err();
        match err {
            CodecError::PatchConflict { record, field } => {
                assert_eq!(record, "com.linkedin.restli.common.ExtensionSchemaAnnotation");
                assert_eq!(field, "versionSuffix");
            }
            other => panic!("unexpected error: {other}"),
        }

        let value = json::decode(
            r#"{"patch":{"$delete":["versionSuffix"],"$set":{"versionSuffix":"v1"}}}"#,
        )
        .unwrap();
        let err = unmarshal_partial_update::<ExtensionSchemaAnnotationPartialUpdate>(&value)
            .unwrap_err();
        assert!(matches!(err.root_cause(), CodecError::PatchConflict { .. }));
    }
}
