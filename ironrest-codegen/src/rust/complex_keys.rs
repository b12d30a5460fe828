//! Complex key code generation.
//!
//! A complex key travels as the flattened fields of its key record, with
//! the optional params record nested under `$params`.

use crate::rust::fields::{TypeRenderer, push_doc};
use ironrest_schema::{ComplexKeyDef, FieldType};

/// Wire key of the params record.
pub const PARAMS_FIELD: &str = "$params";

/// Generator for complex key definitions.
pub struct ComplexKeyGenerator<'a> {
    types: &'a TypeRenderer<'a>,
}

impl<'a> ComplexKeyGenerator<'a> {
    /// Creates a new complex key generator.
    #[must_use]
    pub fn new(types: &'a TypeRenderer<'a>) -> Self {
        Self { types }
    }

    /// Generates a complex key definition.
    #[must_use]
    pub fn generate(&self, key: &ComplexKeyDef) -> String {
        let name = self.types.registry().rendered_name(&key.named.identifier);
        let key_type = self.types.field_type(&FieldType::Reference(key.key.clone()));
        let params_type = self.types.field_type(&FieldType::Reference(key.params.clone()));
        let mut output = String::new();

        output.push_str(&format!("// {}\n\n", name));
        push_doc(&mut output, key.named.doc.as_deref(), "");
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub struct {} {{\n", name));
        output.push_str(&format!("    pub key: {},\n", key_type));
        output.push_str(&format!("    pub params: Option<{}>,\n", params_type));
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::ComputeHash for {} {{\n", name));
        output.push_str("    fn compute_hash(&self) -> rt::Hash {\n");
        output.push_str("        let mut hash = rt::Hash::new();\n");
        output.push_str("        hash.add(&self.key);\n");
        output.push_str("        hash.add(&self.params);\n");
        output.push_str("        hash\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Marshal for {} {{\n", name));
        output.push_str("    fn marshal(&self) -> rt::Result<rt::Value> {\n");
        output.push_str("        let mut value = rt::Marshal::marshal(&self.key)?;\n");
        output.push_str("        if let Some(params) = &self.params {\n");
        output.push_str("            let params = rt::Marshal::marshal(params)\n");
        output.push_str(&format!(
            "                .map_err(|e: rt::CodecError| e.in_field({:?}))?;\n",
            PARAMS_FIELD
        ));
        output.push_str("            if let rt::Value::Map(entries) = &mut value {\n");
        output.push_str(&format!(
            "                entries.insert({:?}.to_string(), params);\n",
            PARAMS_FIELD
        ));
        output.push_str("            }\n");
        output.push_str("        }\n");
        output.push_str("        Ok(value)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        output.push_str(&format!(
            "        let key: {} = rt::Unmarshal::unmarshal(value)?;\n",
            key_type
        ));
        output.push_str(&format!(
            "        let params: Option<{}> = match value.as_map()?.get({:?}) {{\n",
            params_type, PARAMS_FIELD
        ));
        output.push_str(&format!(
            "            Some(params) => Some(\n                rt::Unmarshal::unmarshal(params)\n                    .map_err(|e: rt::CodecError| e.in_field({:?}))?,\n            ),\n",
            PARAMS_FIELD
        ));
        output.push_str("            None => None,\n");
        output.push_str("        };\n");
        output.push_str("        Ok(Self { key, params })\n");
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
        ComplexType, Field, Identifier, NamedType, PrimitiveType, RecordDef, TypeRegistry,
    };

    #[test]
    fn test_generate_complex_key() {
        let mut registry = TypeRegistry::new();
        for (name, field) in [("Key", "id"), ("Params", "version")] {
            registry
                .register(
                    ComplexType::Record(RecordDef {
                        named: NamedType::new(Identifier::new("com.example", name)),
                        fields: vec![Field::required(field, FieldType::Primitive(PrimitiveType::Long))],
                    }),
                    "api",
                )
                .unwrap();
        }
        let key = ComplexKeyDef {
            named: NamedType::new(Identifier::new("com.example", "GreetingKey")),
            key: Identifier::new("com.example", "Key"),
            params: Identifier::new("com.example", "Params"),
        };
        registry.register(ComplexType::ComplexKey(key.clone()), "api").unwrap();
        registry.finalize().unwrap();

        let config = GeneratorConfig::default();
        let types = TypeRenderer::new(&registry, &config);
        let code = ComplexKeyGenerator::new(&types).generate(&key);

        assert!(code.contains("pub struct GreetingKey {\n    pub key: crate::generated::com::example::Key,\n"));
        assert!(code.contains("    pub params: Option<crate::generated::com::example::Params>,\n"));
        assert!(code.contains("entries.insert(\"$params\".to_string(), params);"));
        assert!(code.contains("match value.as_map()?.get(\"$params\")"));
    }
}
