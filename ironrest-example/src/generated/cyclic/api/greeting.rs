// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:
// - schemas/com/example/Greeting.pdl

use ironrest_core as rt;

// Greeting

/// A greeting and its replies.
#[derive(Debug, Clone, PartialEq)]
pub struct Greeting {
    pub id: i64,
    pub message: Option<crate::generated::com::example::common::Text>,
    pub tone: Option<crate::generated::com::example::Tone>,
    pub tags: Option<Vec<String>>,
    pub checksum: Option<crate::generated::com::example::Md5>,
    pub body: Option<Box<crate::generated::com::example::Body>>,
}

pub const GREETING_REQUIRED_FIELDS: rt::RequiredFields =
    rt::RequiredFields::new("com.example.Greeting", &["id"]);

impl rt::ComputeHash for Greeting {
    fn compute_hash(&self) -> rt::Hash {
        let mut hash = rt::Hash::new();
        hash.add(&self.id);
        hash.add(&self.message);
        hash.add(&self.tone);
        hash.add(&self.tags);
        hash.add(&self.checksum);
        hash.add(&self.body);
        hash
    }
}

impl rt::Marshal for Greeting {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut writer = rt::RecordWriter::new();
        writer.optional_field("body", &self.body)?;
        writer.optional_field("checksum", &self.checksum)?;
        writer.field("id", &self.id)?;
        writer.optional_field("message", &self.message)?;
        writer.optional_field("tags", &self.tags)?;
        writer.optional_field("tone", &self.tone)?;
        Ok(writer.finish())
    }
}

impl rt::Unmarshal for Greeting {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let mut id_value: Option<i64> = None;
        let mut message_value: Option<crate::generated::com::example::common::Text> = None;
        let mut tone_value: Option<crate::generated::com::example::Tone> = None;
        let mut tags_value: Option<Vec<String>> = None;
        let mut checksum_value: Option<crate::generated::com::example::Md5> = None;
        let mut body_value: Option<Box<crate::generated::com::example::Body>> = None;
        rt::read_record(value, &GREETING_REQUIRED_FIELDS, |field, value| {
            match field {
                "id" => id_value = Some(rt::Unmarshal::unmarshal(value)?),
                "message" => message_value = Some(rt::Unmarshal::unmarshal(value)?),
                "tone" => tone_value = Some(rt::Unmarshal::unmarshal(value)?),
                "tags" => tags_value = Some(rt::Unmarshal::unmarshal(value)?),
                "checksum" => checksum_value = Some(rt::Unmarshal::unmarshal(value)?),
                "body" => body_value = Some(rt::Unmarshal::unmarshal(value)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Self {
            id: GREETING_REQUIRED_FIELDS.take(id_value, "id")?,
            message: message_value,
            tone: tone_value,
            tags: tags_value,
            checksum: checksum_value,
            body: body_value,
        })
    }
}

/// Fields of [`Greeting`] a partial update removes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GreetingPartialUpdateDeleteFields {
    pub message: bool,
    pub tone: bool,
    pub tags: bool,
    pub checksum: bool,
    pub body: bool,
}

impl rt::Marshal for GreetingPartialUpdateDeleteFields {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut fields = Vec::new();
        if self.body {
            fields.push(rt::Value::from("body"));
        }
        if self.checksum {
            fields.push(rt::Value::from("checksum"));
        }
        if self.message {
            fields.push(rt::Value::from("message"));
        }
        if self.tags {
            fields.push(rt::Value::from("tags"));
        }
        if self.tone {
            fields.push(rt::Value::from("tone"));
        }
        Ok(rt::Value::Array(fields))
    }
}

impl rt::Unmarshal for GreetingPartialUpdateDeleteFields {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let mut fields = Self::default();
        for field in rt::read_delete_fields(value)? {
            match field {
                "message" => fields.message = true,
                "tone" => fields.tone = true,
                "tags" => fields.tags = true,
                "checksum" => fields.checksum = true,
                "body" => fields.body = true,
                _ => {}
            }
        }
        Ok(fields)
    }
}

/// Fields of [`Greeting`] a partial update replaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GreetingPartialUpdateSetFields {
    pub id: Option<i64>,
    pub message: Option<crate::generated::com::example::common::Text>,
    pub tone: Option<crate::generated::com::example::Tone>,
    pub tags: Option<Vec<String>>,
    pub checksum: Option<crate::generated::com::example::Md5>,
    pub body: Option<Box<crate::generated::com::example::Body>>,
}

impl rt::Marshal for GreetingPartialUpdateSetFields {
    fn marshal(&self) -> rt::Result<rt::Value> {
        let mut writer = rt::RecordWriter::new();
        writer.optional_field("body", &self.body)?;
        writer.optional_field("checksum", &self.checksum)?;
        writer.optional_field("id", &self.id)?;
        writer.optional_field("message", &self.message)?;
        writer.optional_field("tags", &self.tags)?;
        writer.optional_field("tone", &self.tone)?;
        Ok(writer.finish())
    }
}

impl rt::Unmarshal for GreetingPartialUpdateSetFields {
    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {
        let mut fields = Self::default();
        rt::read_record(value, &rt::PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {
            match field {
                "id" => fields.id = Some(rt::Unmarshal::unmarshal(value)?),
                "message" => fields.message = Some(rt::Unmarshal::unmarshal(value)?),
                "tone" => fields.tone = Some(rt::Unmarshal::unmarshal(value)?),
                "tags" => fields.tags = Some(rt::Unmarshal::unmarshal(value)?),
                "checksum" => fields.checksum = Some(rt::Unmarshal::unmarshal(value)?),
                "body" => fields.body = Some(rt::Unmarshal::unmarshal(value)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(fields)
    }
}

/// A partial update on [`Greeting`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GreetingPartialUpdate {
    pub delete_fields: GreetingPartialUpdateDeleteFields,
    pub set_fields: GreetingPartialUpdateSetFields,
}

impl GreetingPartialUpdate {
    /// Validates that no field is both deleted and set.
    ///
    /// # Errors
    /// Returns `CodecError::PatchConflict` naming the first offending field.
    pub fn check_fields(&self) -> rt::Result<rt::PatchFieldChecker> {
        let mut checker = rt::PatchFieldChecker::new(GREETING_REQUIRED_FIELDS.record());
        checker.check_field("id", false, self.set_fields.id.is_some())?;
        checker.check_field("message", self.delete_fields.message, self.set_fields.message.is_some())?;
        checker.check_field("tone", self.delete_fields.tone, self.set_fields.tone.is_some())?;
        checker.check_field("tags", self.delete_fields.tags, self.set_fields.tags.is_some())?;
        checker.check_field("checksum", self.delete_fields.checksum, self.set_fields.checksum.is_some())?;
        checker.check_field("body", self.delete_fields.body, self.set_fields.body.is_some())?;
        Ok(checker)
    }
}

impl rt::PartialUpdate for GreetingPartialUpdate {
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

