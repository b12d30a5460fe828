//! Typeref and fixed code generation.

use crate::rust::fields::{TypeRenderer, push_doc};
use ironrest_schema::{FixedDef, TyperefDef};

/// Generator for typerefs and fixed-size byte strings.
pub struct TyperefGenerator<'a> {
    types: &'a TypeRenderer<'a>,
}

impl<'a> TyperefGenerator<'a> {
    /// Creates a new typeref generator.
    #[must_use]
    pub fn new(types: &'a TypeRenderer<'a>) -> Self {
        Self { types }
    }

    /// Generates a typeref.
    ///
    /// Custom typerefs become plain aliases of their target; others become
    /// newtypes with their own codec impls.
    #[must_use]
    pub fn generate_typeref(&self, typeref: &TyperefDef) -> String {
        let id = &typeref.named.identifier;
        let name = self.types.registry().rendered_name(id);
        let mut output = String::new();
        output.push_str(&format!("// {}\n\n", name));
        push_doc(&mut output, typeref.named.doc.as_deref(), "");

        if self.types.registry().is_custom_typeref(id) {
            let target = self.types.element_type(&typeref.target);
            output.push_str(&format!("pub type {} = {};\n\n", name, target));
            return output;
        }

        let target = self.types.field_type(&typeref.target);
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub struct {}(pub {});\n\n", name, target));

        output.push_str(&format!("impl From<{}> for {} {{\n", target, name));
        output.push_str(&format!("    fn from(value: {}) -> Self {{\n", target));
        output.push_str("        Self(value)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&self.generate_delegating_impls(&name));
        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        output.push_str("        rt::Unmarshal::unmarshal(value).map(Self)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    /// Generates a fixed-size byte string.
    #[must_use]
    pub fn generate_fixed(&self, fixed: &FixedDef) -> String {
        let id = &fixed.named.identifier;
        let name = self.types.registry().rendered_name(id);
        let mut output = String::new();
        output.push_str(&format!("// {}\n\n", name));
        push_doc(&mut output, fixed.named.doc.as_deref(), "");
        output.push_str("#[derive(Debug, Clone, PartialEq, Eq)]\n");
        output.push_str(&format!("pub struct {}(rt::Bytes);\n\n", name));

        output.push_str(&format!("impl {} {{\n", name));
        output.push_str("    /// Number of bytes every value holds.\n");
        output.push_str(&format!("    pub const SIZE: usize = {};\n\n", fixed.size));
        output.push_str("    /// Creates a value, checking its length.\n");
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `CodecError` if the length is not `SIZE`.\n");
        output.push_str("    pub fn new(bytes: impl Into<Vec<u8>>) -> rt::Result<Self> {\n");
        output.push_str("        let bytes = rt::Bytes::new(bytes);\n");
        output.push_str("        if bytes.len() != Self::SIZE {\n");
        output.push_str("            return Err(rt::CodecError::invalid(format!(\n");
        output.push_str(&format!(
            "                \"{} expects {{}} bytes, found {{}}\",\n",
            id.full_name()
        ));
        output.push_str("                Self::SIZE,\n");
        output.push_str("                bytes.len()\n");
        output.push_str("            )));\n");
        output.push_str("        }\n");
        output.push_str("        Ok(Self(bytes))\n");
        output.push_str("    }\n\n");
        output.push_str("    /// Returns the bytes.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn as_bytes(&self) -> &[u8] {\n");
        output.push_str("        &self.0\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&self.generate_delegating_impls(&name));
        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        output.push_str("        Self::new(value.as_bytes()?.0)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    /// Hash and marshal impls forwarding to the wrapped value.
    fn generate_delegating_impls(&self, name: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("impl rt::ComputeHash for {} {{\n", name));
        output.push_str("    fn compute_hash(&self) -> rt::Hash {\n");
        output.push_str("        rt::ComputeHash::compute_hash(&self.0)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Marshal for {} {{\n", name));
        output.push_str("    fn marshal(&self) -> rt::Result<rt::Value> {\n");
        output.push_str("        rt::Marshal::marshal(&self.0)\n");
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

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for (name, custom) in [("Url", true), ("Urn", false)] {
            registry
                .register(
                    ComplexType::Typeref(TyperefDef {
                        named: NamedType::new(Identifier::new("com.example", name)),
                        target: FieldType::Primitive(PrimitiveType::String),
                    }),
                    "api",
                )
                .unwrap();
            if custom {
                registry.set_custom_typeref(&Identifier::new("com.example", name));
            }
        }
        registry
            .register(
                ComplexType::Fixed(FixedDef {
                    named: NamedType::new(Identifier::new("com.example", "Md5")),
                    size: 16,
                }),
                "api",
            )
            .unwrap();
        registry.finalize().unwrap();
        registry
    }

    #[test]
    fn test_custom_typeref_is_an_alias() {
        let registry = registry();
        let config = GeneratorConfig::default();
        let types = TypeRenderer::new(&registry, &config);
        let ComplexType::Typeref(url) = registry.resolve(&Identifier::new("com.example", "Url")) else {
            panic!("expected a typeref");
        };
        let code = TyperefGenerator::new(&types).generate_typeref(url);
        assert!(code.contains("pub type Url = String;"));
        assert!(!code.contains("impl rt::Marshal"));
    }

    #[test]
    fn test_typeref_newtype() {
        let registry = registry();
        let config = GeneratorConfig::default();
        let types = TypeRenderer::new(&registry, &config);
        let ComplexType::Typeref(urn) = registry.resolve(&Identifier::new("com.example", "Urn")) else {
            panic!("expected a typeref");
        };
        let code = TyperefGenerator::new(&types).generate_typeref(urn);
        assert!(code.contains("pub struct Urn(pub String);"));
        assert!(code.contains("impl From<String> for Urn {"));
        assert!(code.contains("rt::Unmarshal::unmarshal(value).map(Self)"));
    }

    #[test]
    fn test_fixed() {
        let registry = registry();
        let config = GeneratorConfig::default();
        let types = TypeRenderer::new(&registry, &config);
        let ComplexType::Fixed(md5) = registry.resolve(&Identifier::new("com.example", "Md5")) else {
            panic!("expected a fixed type");
        };
        let code = TyperefGenerator::new(&types).generate_fixed(md5);
        assert!(code.contains("pub struct Md5(rt::Bytes);"));
        assert!(code.contains("pub const SIZE: usize = 16;"));
        assert!(code.contains("\"com.example.Md5 expects {} bytes, found {}\","));
    }
}
