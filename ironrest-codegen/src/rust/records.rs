//! Record code generation.
//!
//! Each record yields the struct itself, its required-fields table, hash and
//! codec impls, and the three partial-update types.

use crate::error::CodegenError;
use crate::rust::fields::{
    TypeRenderer, check_unique, field_ident, field_local, push_doc, required_fields_const,
};
use ironrest_schema::{Field, RecordDef};

/// Generator for record definitions.
pub struct RecordGenerator<'a> {
    types: &'a TypeRenderer<'a>,
}

struct RenderedField<'f> {
    field: &'f Field,
    ident: String,
    local: String,
    rust_type: String,
}

impl<'a> RecordGenerator<'a> {
    /// Creates a new record generator.
    #[must_use]
    pub fn new(types: &'a TypeRenderer<'a>) -> Self {
        Self { types }
    }

    /// Generates a record and its partial-update types.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if two fields render to the same
    /// Rust identifier.
    pub fn generate(&self, record: &RecordDef) -> Result<String, CodegenError> {
        let id = &record.named.identifier;
        let name = self.types.registry().rendered_name(id);
        let fields: Vec<RenderedField<'_>> = record
            .fields
            .iter()
            .map(|field| RenderedField {
                field,
                ident: field_ident(&field.name),
                local: field_local(&field.name),
                rust_type: self.types.field_type(&field.field_type),
            })
            .collect();
        check_unique(fields.iter().map(|f| f.ident.as_str()), id)?;

        let mut sorted: Vec<&RenderedField<'_>> = fields.iter().collect();
        sorted.sort_by(|a, b| a.field.name.cmp(&b.field.name));

        let mut output = String::new();
        output.push_str(&format!("// {}\n\n", name));
        output.push_str(&self.generate_struct(record, &name, &fields));
        output.push_str(&self.generate_required_fields(record, &name));
        output.push_str(&self.generate_hash(&name, &fields));
        output.push_str(&self.generate_marshal(&name, &sorted));
        output.push_str(&self.generate_unmarshal(&name, &fields));
        output.push_str(&self.generate_delete_fields(&name, &fields, &sorted));
        output.push_str(&self.generate_set_fields(&name, &fields, &sorted));
        output.push_str(&self.generate_partial_update(&name, &fields));
        Ok(output)
    }

    fn generate_struct(&self, record: &RecordDef, name: &str, fields: &[RenderedField<'_>]) -> String {
        let mut output = String::new();
        push_doc(&mut output, record.named.doc.as_deref(), "");
        if fields.iter().all(|f| f.field.optional) {
            output.push_str("#[derive(Debug, Clone, PartialEq, Default)]\n");
        } else {
            output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        }
        if fields.is_empty() {
            output.push_str(&format!("pub struct {} {{}}\n\n", name));
            return output;
        }

        output.push_str(&format!("pub struct {} {{\n", name));
        for f in fields {
            push_doc(&mut output, f.field.doc.as_deref(), "    ");
            if f.field.optional {
                output.push_str(&format!("    pub {}: Option<{}>,\n", f.ident, f.rust_type));
            } else {
                output.push_str(&format!("    pub {}: {},\n", f.ident, f.rust_type));
            }
        }
        output.push_str("}\n\n");
        output
    }

    fn generate_required_fields(&self, record: &RecordDef, name: &str) -> String {
        let required: Vec<String> = record
            .required_fields()
            .map(|f| format!("{:?}", f.name))
            .collect();
        format!(
            "pub const {}: rt::RequiredFields =\n    rt::RequiredFields::new({:?}, &[{}]);\n\n",
            required_fields_const(name),
            record.named.identifier.full_name(),
            required.join(", ")
        )
    }

    fn generate_hash(&self, name: &str, fields: &[RenderedField<'_>]) -> String {
        let mut output = String::new();
        output.push_str(&format!("impl rt::ComputeHash for {} {{\n", name));
        output.push_str("    fn compute_hash(&self) -> rt::Hash {\n");
        if fields.is_empty() {
            output.push_str("        rt::Hash::new()\n");
        } else {
            output.push_str("        let mut hash = rt::Hash::new();\n");
            for f in fields {
                output.push_str(&format!("        hash.add(&self.{});\n", f.ident));
            }
            output.push_str("        hash\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_marshal(&self, name: &str, sorted: &[&RenderedField<'_>]) -> String {
        let mut output = String::new();
        output.push_str(&format!("impl rt::Marshal for {} {{\n", name));
        output.push_str("    fn marshal(&self) -> rt::Result<rt::Value> {\n");
        if sorted.is_empty() {
            output.push_str("        Ok(rt::RecordWriter::new().finish())\n");
        } else {
            output.push_str("        let mut writer = rt::RecordWriter::new();\n");
            for f in sorted {
                let method = if f.field.optional {
                    "optional_field"
                } else {
                    "field"
                };
                output.push_str(&format!(
                    "        writer.{}({:?}, &self.{})?;\n",
                    method, f.field.name, f.ident
                ));
            }
            output.push_str("        Ok(writer.finish())\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_unmarshal(&self, name: &str, fields: &[RenderedField<'_>]) -> String {
        let required = required_fields_const(name);
        let mut output = String::new();
        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        if fields.is_empty() {
            output.push_str(&format!(
                "        rt::read_record(value, &{}, |_, _| Ok(false))?;\n",
                required
            ));
            output.push_str("        Ok(Self {})\n");
            output.push_str("    }\n");
            output.push_str("}\n\n");
            return output;
        }

        for f in fields {
            output.push_str(&format!(
                "        let mut {}: Option<{}> = None;\n",
                f.local, f.rust_type
            ));
        }
        output.push_str(&format!(
            "        rt::read_record(value, &{}, |field, value| {{\n",
            required
        ));
        output.push_str("            match field {\n");
        for f in fields {
            output.push_str(&format!(
                "                {:?} => {} = Some(rt::Unmarshal::unmarshal(value)?),\n",
                f.field.name, f.local
            ));
        }
        output.push_str("                _ => return Ok(false),\n");
        output.push_str("            }\n");
        output.push_str("            Ok(true)\n");
        output.push_str("        })?;\n");
        output.push_str("        Ok(Self {\n");
        for f in fields {
            if f.field.optional {
                output.push_str(&format!("            {}: {},\n", f.ident, f.local));
            } else {
                output.push_str(&format!(
                    "            {}: {}.take({}, {:?})?,\n",
                    f.ident, required, f.local, f.field.name
                ));
            }
        }
        output.push_str("        })\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_delete_fields(
        &self,
        name: &str,
        fields: &[RenderedField<'_>],
        sorted: &[&RenderedField<'_>],
    ) -> String {
        let type_name = format!("{}PartialUpdateDeleteFields", name);
        let deletable: Vec<&RenderedField<'_>> = fields.iter().filter(|f| f.field.optional).collect();
        let mut output = String::new();

        output.push_str(&format!("/// Fields of [`{}`] a partial update removes.\n", name));
        output.push_str("#[derive(Debug, Clone, PartialEq, Default)]\n");
        if deletable.is_empty() {
            output.push_str(&format!("pub struct {} {{}}\n\n", type_name));
        } else {
            output.push_str(&format!("pub struct {} {{\n", type_name));
            for f in &deletable {
                output.push_str(&format!("    pub {}: bool,\n", f.ident));
            }
            output.push_str("}\n\n");
        }

        output.push_str(&format!("impl rt::Marshal for {} {{\n", type_name));
        output.push_str("    fn marshal(&self) -> rt::Result<rt::Value> {\n");
        if deletable.is_empty() {
            output.push_str("        Ok(rt::Value::Array(Vec::new()))\n");
        } else {
            output.push_str("        let mut fields = Vec::new();\n");
            for f in sorted.iter().filter(|f| f.field.optional) {
                output.push_str(&format!("        if self.{} {{\n", f.ident));
                output.push_str(&format!(
                    "            fields.push(rt::Value::from({:?}));\n",
                    f.field.name
                ));
                output.push_str("        }\n");
            }
            output.push_str("        Ok(rt::Value::Array(fields))\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", type_name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        if deletable.is_empty() {
            output.push_str("        rt::read_delete_fields(value)?;\n");
            output.push_str("        Ok(Self {})\n");
        } else {
            output.push_str("        let mut fields = Self::default();\n");
            output.push_str("        for field in rt::read_delete_fields(value)? {\n");
            output.push_str("            match field {\n");
            for f in &deletable {
                output.push_str(&format!(
                    "                {:?} => fields.{} = true,\n",
                    f.field.name, f.ident
                ));
            }
            output.push_str("                _ => {}\n");
            output.push_str("            }\n");
            output.push_str("        }\n");
            output.push_str("        Ok(fields)\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_set_fields(
        &self,
        name: &str,
        fields: &[RenderedField<'_>],
        sorted: &[&RenderedField<'_>],
    ) -> String {
        let type_name = format!("{}PartialUpdateSetFields", name);
        let mut output = String::new();

        output.push_str(&format!("/// Fields of [`{}`] a partial update replaces.\n", name));
        output.push_str("#[derive(Debug, Clone, PartialEq, Default)]\n");
        if fields.is_empty() {
            output.push_str(&format!("pub struct {} {{}}\n\n", type_name));
        } else {
            output.push_str(&format!("pub struct {} {{\n", type_name));
            for f in fields {
                output.push_str(&format!("    pub {}: Option<{}>,\n", f.ident, f.rust_type));
            }
            output.push_str("}\n\n");
        }

        output.push_str(&format!("impl rt::Marshal for {} {{\n", type_name));
        output.push_str("    fn marshal(&self) -> rt::Result<rt::Value> {\n");
        if fields.is_empty() {
            output.push_str("        Ok(rt::RecordWriter::new().finish())\n");
        } else {
            output.push_str("        let mut writer = rt::RecordWriter::new();\n");
            for f in sorted {
                output.push_str(&format!(
                    "        writer.optional_field({:?}, &self.{})?;\n",
                    f.field.name, f.ident
                ));
            }
            output.push_str("        Ok(writer.finish())\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", type_name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        if fields.is_empty() {
            output.push_str(
                "        rt::read_record(value, &rt::PATCH_SECTIONS_REQUIRED_FIELDS, |_, _| Ok(false))?;\n",
            );
            output.push_str("        Ok(Self {})\n");
        } else {
            output.push_str("        let mut fields = Self::default();\n");
            output.push_str(
                "        rt::read_record(value, &rt::PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {\n",
            );
            output.push_str("            match field {\n");
            for f in fields {
                output.push_str(&format!(
                    "                {:?} => fields.{} = Some(rt::Unmarshal::unmarshal(value)?),\n",
                    f.field.name, f.ident
                ));
            }
            output.push_str("                _ => return Ok(false),\n");
            output.push_str("            }\n");
            output.push_str("            Ok(true)\n");
            output.push_str("        })?;\n");
            output.push_str("        Ok(fields)\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_partial_update(&self, name: &str, fields: &[RenderedField<'_>]) -> String {
        let type_name = format!("{}PartialUpdate", name);
        let required = required_fields_const(name);
        let mut output = String::new();

        output.push_str(&format!("/// A partial update on [`{}`].\n", name));
        output.push_str("#[derive(Debug, Clone, PartialEq, Default)]\n");
        output.push_str(&format!("pub struct {} {{\n", type_name));
        output.push_str(&format!("    pub delete_fields: {}PartialUpdateDeleteFields,\n", name));
        output.push_str(&format!("    pub set_fields: {}PartialUpdateSetFields,\n", name));
        output.push_str("}\n\n");

        output.push_str(&format!("impl {} {{\n", type_name));
        output.push_str("    /// Validates that no field is both deleted and set.\n");
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `CodecError::PatchConflict` naming the first offending field.\n");
        output.push_str("    pub fn check_fields(&self) -> rt::Result<rt::PatchFieldChecker> {\n");
        if fields.is_empty() {
            output.push_str(&format!(
                "        Ok(rt::PatchFieldChecker::new({}.record()))\n",
                required
            ));
        } else {
            output.push_str(&format!(
                "        let mut checker = rt::PatchFieldChecker::new({}.record());\n",
                required
            ));
            for f in fields {
                let deleted = if f.field.optional {
                    format!("self.delete_fields.{}", f.ident)
                } else {
                    "false".to_string()
                };
                output.push_str(&format!(
                    "        checker.check_field({:?}, {}, self.set_fields.{}.is_some())?;\n",
                    f.field.name, deleted, f.ident
                ));
            }
            output.push_str("        Ok(checker)\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::PartialUpdate for {} {{\n", type_name));
        output.push_str("    fn marshal_patch(&self) -> rt::Result<rt::Value> {\n");
        output.push_str("        let checker = self.check_fields()?;\n");
        output.push_str("        let mut writer = rt::RecordWriter::new();\n");
        output.push_str("        if checker.has_deletes() {\n");
        output.push_str("            writer.field(rt::DELETE_FIELD, &self.delete_fields)?;\n");
        output.push_str("        }\n");
        output.push_str("        if checker.has_sets() {\n");
        output.push_str("            writer.field(rt::SET_FIELD, &self.set_fields)?;\n");
        output.push_str("        }\n");
        output.push_str("        Ok(writer.finish())\n");
        output.push_str("    }\n\n");
        output.push_str("    fn unmarshal_patch(value: &rt::Value) -> rt::Result<Self> {\n");
        output.push_str("        let mut patch = Self::default();\n");
        output.push_str(
            "        rt::read_record(value, &rt::PATCH_SECTIONS_REQUIRED_FIELDS, |field, value| {\n",
        );
        output.push_str("            match field {\n");
        output.push_str(
            "                rt::DELETE_FIELD => patch.delete_fields = rt::Unmarshal::unmarshal(value)?,\n",
        );
        output.push_str(
            "                rt::SET_FIELD => patch.set_fields = rt::Unmarshal::unmarshal(value)?,\n",
        );
        output.push_str("                _ => return Ok(false),\n");
        output.push_str("            }\n");
        output.push_str("            Ok(true)\n");
        output.push_str("        })?;\n");
        output.push_str("        patch.check_fields()?;\n");
        output.push_str("        Ok(patch)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use ironrest_schema::{
        ComplexType, FieldType, Identifier, NamedType, PrimitiveType, TypeRegistry,
    };

    fn registry(records: Vec<RecordDef>) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for record in records {
            registry.register(ComplexType::Record(record), "api").unwrap();
        }
        registry.finalize().unwrap();
        registry
    }

    fn greeting() -> RecordDef {
        RecordDef {
            named: NamedType::new(Identifier::new("com.example", "Greeting")).with_doc("A greeting."),
            fields: vec![
                Field::required("id", FieldType::Primitive(PrimitiveType::Long)),
                Field::optional("message", FieldType::Primitive(PrimitiveType::String)),
                Field::optional("next", FieldType::reference("com.example", "Greeting")),
            ],
        }
    }

    fn generate(record: RecordDef) -> Result<String, CodegenError> {
        let registry = registry(vec![record.clone()]);
        let config = GeneratorConfig::default();
        let types = TypeRenderer::new(&registry, &config);
        RecordGenerator::new(&types).generate(&record)
    }

    #[test]
    fn test_generate_struct() {
        let code = generate(greeting()).expect("Failed to generate");
        assert!(code.contains("/// A greeting.\n#[derive(Debug, Clone, PartialEq)]\npub struct Greeting {"));
        assert!(code.contains("    pub id: i64,\n"));
        assert!(code.contains("    pub message: Option<String>,\n"));
        assert!(code.contains("    pub next: Option<Box<crate::generated::com::example::Greeting>>,\n"));
        assert!(code.contains(
            "pub const GREETING_REQUIRED_FIELDS: rt::RequiredFields =\n    rt::RequiredFields::new(\"com.example.Greeting\", &[\"id\"]);"
        ));
    }

    #[test]
    fn test_marshal_writes_fields_in_wire_order() {
        let code = generate(greeting()).unwrap();
        let id = code.find("writer.field(\"id\", &self.id)?;").unwrap();
        let message = code.find("writer.optional_field(\"message\", &self.message)?;").unwrap();
        let next = code.find("writer.optional_field(\"next\", &self.next)?;").unwrap();
        assert!(id < message && message < next);
    }

    #[test]
    fn test_unmarshal_takes_required_fields() {
        let code = generate(greeting()).unwrap();
        assert!(code.contains("let mut id_value: Option<i64> = None;"));
        assert!(code.contains("\"id\" => id_value = Some(rt::Unmarshal::unmarshal(value)?),"));
        assert!(code.contains("id: GREETING_REQUIRED_FIELDS.take(id_value, \"id\")?,"));
        assert!(code.contains("message: message_value,"));
    }

    #[test]
    fn test_required_fields_are_never_deleted() {
        let code = generate(greeting()).unwrap();
        assert!(code.contains("pub struct GreetingPartialUpdateDeleteFields {\n    pub message: bool,\n    pub next: bool,\n}"));
        assert!(code.contains("checker.check_field(\"id\", false, self.set_fields.id.is_some())?;"));
        assert!(code.contains(
            "checker.check_field(\"message\", self.delete_fields.message, self.set_fields.message.is_some())?;"
        ));
        assert!(code.contains("impl rt::PartialUpdate for GreetingPartialUpdate {"));
    }

    #[test]
    fn test_all_optional_record_derives_default() {
        let code = generate(RecordDef {
            named: NamedType::new(Identifier::new("com.example", "Options")),
            fields: vec![Field::optional("versionSuffix", FieldType::Primitive(PrimitiveType::String))],
        })
        .unwrap();
        assert!(code.contains("#[derive(Debug, Clone, PartialEq, Default)]\npub struct Options {"));
        assert!(code.contains("pub version_suffix: Option<String>,"));
        assert!(code.contains("writer.optional_field(\"versionSuffix\", &self.version_suffix)?;"));
    }

    #[test]
    fn test_empty_record() {
        let code = generate(RecordDef {
            named: NamedType::new(Identifier::new("com.example", "Empty")),
            fields: vec![],
        })
        .unwrap();
        assert!(code.contains("pub struct Empty {}"));
        assert!(code.contains("rt::read_record(value, &EMPTY_REQUIRED_FIELDS, |_, _| Ok(false))?;"));
        assert!(code.contains("Ok(rt::PatchFieldChecker::new(EMPTY_REQUIRED_FIELDS.record()))"));
        assert!(!code.contains("let mut hash"));
    }

    #[test]
    fn test_colliding_field_identifiers() {
        let err = generate(RecordDef {
            named: NamedType::new(Identifier::new("com.example", "Clash")),
            fields: vec![
                Field::optional("fooBar", FieldType::Primitive(PrimitiveType::Int)),
                Field::optional("foo_bar", FieldType::Primitive(PrimitiveType::Int)),
            ],
        })
        .unwrap_err();
        assert!(err.to_string().contains("renders 'foo_bar' more than once"));
    }
}
