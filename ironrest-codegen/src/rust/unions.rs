//! Standalone union code generation.
//!
//! A union is a Rust enum with one variant per member. On the wire it is a
//! map holding exactly one entry, keyed by the member key.

use crate::error::CodegenError;
use crate::rust::fields::{TypeRenderer, check_unique, check_variant_name, push_doc};
use ironrest_schema::{FieldType, UnionDef, UnionMember, to_pascal_case};

/// Generator for standalone unions.
pub struct UnionGenerator<'a> {
    types: &'a TypeRenderer<'a>,
}

struct RenderedMember {
    variant: String,
    key: String,
    rust_type: String,
}

impl<'a> UnionGenerator<'a> {
    /// Creates a new union generator.
    #[must_use]
    pub fn new(types: &'a TypeRenderer<'a>) -> Self {
        Self { types }
    }

    /// Generates a union definition.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if two members render to the same
    /// variant, or a member renders to a reserved name.
    pub fn generate(&self, union: &UnionDef) -> Result<String, CodegenError> {
        let id = &union.named.identifier;
        let name = self.types.registry().rendered_name(id);
        let members: Vec<RenderedMember> = union
            .members
            .iter()
            .map(|member| RenderedMember {
                variant: member_variant(member),
                key: member.member_key(),
                rust_type: self.types.field_type(&member.member_type),
            })
            .collect();
        for member in &members {
            check_variant_name(&member.variant, id)?;
        }
        check_unique(members.iter().map(|m| m.variant.as_str()), id)?;

        let mut output = String::new();
        output.push_str(&format!("// {}\n\n", name));
        push_doc(&mut output, union.named.doc.as_deref(), "");
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub enum {} {{\n", name));
        for member in &members {
            output.push_str(&format!("    {}({}),\n", member.variant, member.rust_type));
        }
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::ComputeHash for {} {{\n", name));
        output.push_str("    fn compute_hash(&self) -> rt::Hash {\n");
        output.push_str("        let mut hash = rt::Hash::new();\n");
        output.push_str("        match self {\n");
        for member in &members {
            output.push_str(&format!("            Self::{}(member) => {{\n", member.variant));
            output.push_str(&format!("                hash.add_string({:?});\n", member.key));
            output.push_str("                hash.add(member);\n");
            output.push_str("            }\n");
        }
        output.push_str("        }\n");
        output.push_str("        hash\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Marshal for {} {{\n", name));
        output.push_str("    fn marshal(&self) -> rt::Result<rt::Value> {\n");
        output.push_str("        let mut writer = rt::RecordWriter::new();\n");
        output.push_str("        match self {\n");
        for member in &members {
            output.push_str(&format!(
                "            Self::{}(member) => writer.field({:?}, member)?,\n",
                member.variant, member.key
            ));
        }
        output.push_str("        };\n");
        output.push_str("        Ok(writer.finish())\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        output.push_str("        let entries = value.as_map()?;\n");
        output.push_str("        let mut iter = entries.iter();\n");
        output.push_str("        let (Some((key, member)), None) = (iter.next(), iter.next()) else {\n");
        output.push_str("            return Err(rt::CodecError::invalid(format!(\n");
        output.push_str(&format!(
            "                \"union {} must hold exactly one member, found {{}}\",\n",
            id.full_name()
        ));
        output.push_str("                entries.len()\n");
        output.push_str("            )));\n");
        output.push_str("        };\n");
        output.push_str("        let read = match key.as_str() {\n");
        for member in &members {
            output.push_str(&format!(
                "            {:?} => rt::Unmarshal::unmarshal(member).map(Self::{}),\n",
                member.key, member.variant
            ));
        }
        output.push_str("            other => {\n");
        output.push_str("                return Err(rt::CodecError::invalid(format!(\n");
        output.push_str(&format!(
            "                    \"unknown member '{{other}}' of union {}\"\n",
            id.full_name()
        ));
        output.push_str("                )));\n");
        output.push_str("            }\n");
        output.push_str("        };\n");
        output.push_str("        read.map_err(|e| e.in_field(key.as_str()))\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        Ok(output)
    }
}

/// Returns the variant name of a union member.
#[must_use]
pub fn member_variant(member: &UnionMember) -> String {
    if let Some(alias) = &member.alias {
        return to_pascal_case(alias);
    }
    match &member.member_type {
        FieldType::Primitive(primitive) => to_pascal_case(primitive.schema_name()),
        FieldType::Reference(id) => to_pascal_case(id.name()),
        FieldType::Array(_) => "Array".to_string(),
        FieldType::Map(_) => "Map".to_string(),
    }
}
