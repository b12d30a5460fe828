// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/common/Text.pdl

use ironrest_core as rt;

// Text

/// Localized text.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub lang: Option<String>,
}

pub const TEXT_REQUIRED_FIELDS: rt::RequiredFields =
    rt::RequiredFields::new("com.example.common.Text", &["value"]);

impl rt::ComputeHash for Text {
    fn compute_hash(&self) -> rt::Hash {
        let mut hash = rt::Hash::new();
        hash.add(&self.value);
        hash.add(&self.lang);
        hash
    }
}

impl rt::Marshal for Text {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut writer = rt::RecordWriter::new();
        writer.optional_field("lang", &self.lang)?;
        writer.field("value", &self.value)?;
        Ok(writer.finish())
    }
}

impl rt::Unmarshal for Text {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let mut value_value: Option<String> = None;
        let mut lang_value: Option<String> = None;
        rt::read_record(value, &TEXT_REQUIRED_FIELDS, |field, value| {
            match field {
                "value" => value_value = Some(rt::Unmarshal::unmarshal(value)?),
                "lang" => lang_value = Some(rt::Unmarshal::unmarshal(value)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Self {
            value: TEXT_REQUIRED_FIELDS.take(value_value, "value")?,
            lang: lang_value,
        })
    }
}

/// Fields of [`Text`] a partial update removes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextPartialUpdateDeleteFields {
    pub lang: bool,
}

impl rt::Marshal for TextPartialUpdateDeleteFields {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut fields = Vec::new();
        if self.lang {
            fields.push(rt::Value::from("lang"));
        }
        Ok(rt::Value::Array(fields))
    }
}

impl rt::Unmarshal for TextPartialUpdateDeleteFields {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let mut fields = Self::default();
        for field in rt::read_delete_fields(value)? {
            match field {
                "lang" => fields.lang = true,
                _ => {}
            }
        }
        Ok(fields)
    }
}

/// Fields of [`Text`] a partial update replaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextPartialUpdateSetFields {
    pub value: Option<String>,
    pub lang: Option<String>,
}

impl rt::Marshal for TextPartialUpdateSetFields {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut writer = rt::RecordWriter::new();
        writer.optional_field("lang", &self.lang)?;
        writer.optional_field("value", &self.value)?;
        Ok(writer.finish())
    }
}

impl rt::Unmarshal for TextPartialUpdateSetFields {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let mut fields = Self::default();
        rt::read_record(value, &rt::PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {
            match field {
                "value" => fields.value = Some(rt::Unmarshal::unmarshal(value)?),
                "lang" => fields.lang = Some(rt::Unmarshal::unmarshal(value)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(fields)
    }
}

/// A partial update on [`Text`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextPartialUpdate {
    pub delete_fields: TextPartialUpdateDeleteFields,
    pub set_fields: TextPartialUpdateSetFields,
}

impl TextPartialUpdate {
    /// Validates that no field is both deleted and set.
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` naming the first offending field.
    pub fn check_fields(&self) -> rt::Result<rt::PatchFieldChecker> {
        let mut checker = rt::PatchFieldChecker::new(TEXT_REQUIRED_FIELDS.record());
        checker.check_field("value", false, self.set_fields.value.is_some())?;
        checker.check_field("lang", self.delete_fields.lang, self.set_fields.lang.is_some())?;
        Ok(checker)
    }
}

impl rt::PartialUpdate for TextPartialUpdate {
    fn marshal_patch(&self) -> rt::Result<rt::Value> {
        let checker = self.check_fields()?;
        let mut writer = rt::RecordWriter::new();
        if checker.has_deletes() {
            writer.field(rt::DELETE_FIELD, &self.delete_fields)?;
        }
        if checker.has_sets() {
            writer.field(rt::SET_FIELD, &self.set_fields)?;
        }
        Ok(writer.finish())
    }

    fn unmarshal_patch(value: &rt::Value) -> rt::Result<Self> {
        let mut patch = Self::default();
        rt::read_record(value, &rt::PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {
            match field {
                rt::DELETE_FIELD => patch.delete_fields = rt::Unmarshal::unmarshal(value)?,
                rt::SET_FIELD => patch.set_fields = rt::Unmarshal::unmarshal(value)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        patch.check_fields()?;
        Ok(patch)
    }
}

