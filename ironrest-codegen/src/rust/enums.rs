//! Enum code generation.

use crate::error::CodegenError;
use crate::rust::fields::{TypeRenderer, check_unique, check_variant_name, push_doc};
use ironrest_schema::{EnumDef, UNKNOWN_ENUM_SYMBOL, to_pascal_case};

/// Variant holding symbols this version of the schema does not know.
pub const UNRECOGNIZED_VARIANT: &str = "Unrecognized";

/// Generator for enum definitions.
pub struct EnumGenerator<'a> {
    types: &'a TypeRenderer<'a>,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(types: &'a TypeRenderer<'a>) -> Self {
        Self { types }
    }

    /// Generates an enum definition.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if two symbols render to the same
    /// variant, or a symbol renders to a reserved variant name.
    pub fn generate(&self, enum_def: &EnumDef) -> Result<String, CodegenError> {
        let id = &enum_def.named.identifier;
        let name = self.types.registry().rendered_name(id);
        let variants: Vec<(String, &str)> = enum_def
            .symbols
            .iter()
            .map(|symbol| (variant_name(symbol), symbol.as_str()))
            .collect();
        for (variant, _) in &variants {
            check_variant_name(variant, id)?;
        }
        check_unique(
            variants
                .iter()
                .map(|(v, _)| v.as_str())
                .chain([UNRECOGNIZED_VARIANT]),
            id,
        )?;

        let mut output = String::new();
        output.push_str(&format!("// {}\n\n", name));
        push_doc(&mut output, enum_def.named.doc.as_deref(), "");
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq)]\n");
        output.push_str(&format!("pub enum {} {{\n", name));
        for (variant, symbol) in &variants {
            output.push_str(&format!("    /// `{}`\n", symbol));
            output.push_str(&format!("    {},\n", variant));
        }
        output.push_str("    /// A symbol unknown to this version of the schema.\n");
        output.push_str(&format!("    {},\n", UNRECOGNIZED_VARIANT));
        output.push_str("}\n\n");

        output.push_str(&format!("impl {} {{\n", name));
        output.push_str("    /// Returns the wire symbol.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn as_str(&self) -> &'static str {\n");
        output.push_str("        match self {\n");
        for (variant, symbol) in &variants {
            output.push_str(&format!("            Self::{} => {:?},\n", variant, symbol));
        }
        output.push_str(&format!(
            "            Self::{} => {:?},\n",
            UNRECOGNIZED_VARIANT, UNKNOWN_ENUM_SYMBOL
        ));
        output.push_str("        }\n");
        output.push_str("    }\n\n");
        output.push_str("    /// Parses a wire symbol; unknown symbols map to the fallback variant.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn from_symbol(symbol: &str) -> Self {\n");
        output.push_str("        match symbol {\n");
        for (variant, symbol) in &variants {
            output.push_str(&format!("            {:?} => Self::{},\n", symbol, variant));
        }
        output.push_str(&format!("            _ => Self::{},\n", UNRECOGNIZED_VARIANT));
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::ComputeHash for {} {{\n", name));
        output.push_str("    fn compute_hash(&self) -> rt::Hash {\n");
        output.push_str("        let mut hash = rt::Hash::new();\n");
        output.push_str("        hash.add_string(self.as_str());\n");
        output.push_str("        hash\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Marshal for {} {{\n", name));
        output.push_str("    fn marshal(&self) -> rt::Result<rt::Value> {\n");
        output.push_str(&format!("        if *self == Self::{} {{\n", UNRECOGNIZED_VARIANT));
        output.push_str(&format!(
            "            return Err(rt::CodecError::invalid({:?}));\n",
            format!("cannot marshal an unrecognized {} symbol", id.full_name())
        ));
        output.push_str("        }\n");
        output.push_str("        Ok(rt::Value::from(self.as_str()))\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl rt::Unmarshal for {} {{\n", name));
        output.push_str("    fn unmarshal(value: &rt::Value) -> rt::Result<Self> {\n");
        output.push_str("        value.as_str().map(Self::from_symbol)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        Ok(output)
    }
}

/// Returns the variant name of an enum symbol.
#[must_use]
pub fn variant_name(symbol: &str) -> String {
    to_pascal_case(&symbol.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use ironrest_schema::{ComplexType, Identifier, NamedType, TypeRegistry};

    fn generate(symbols: &[&str]) -> Result<String, CodegenError> {
        let enum_def = EnumDef {
            named: NamedType::new(Identifier::new("com.example", "Tone")),
            symbols: symbols.iter().map(|s| (*s).to_string()).collect(),
        };
        let mut registry = TypeRegistry::new();
        registry.register(ComplexType::Enum(enum_def.clone()), "api").unwrap();
        registry.finalize().unwrap();
        let config = GeneratorConfig::default();
        let types = TypeRenderer::new(&registry, &config);
        EnumGenerator::new(&types).generate(&enum_def)
    }

    #[test]
    fn test_variant_name() {
        assert_eq!(variant_name("FRIENDLY"), "Friendly");
        assert_eq!(variant_name("GET_ALL"), "GetAll");
    }

    #[test]
    fn test_generate_enum() {
        let code = generate(&["FRIENDLY", "GET_ALL"]).expect("Failed to generate");
        assert!(code.contains("pub enum Tone {"));
        assert!(code.contains("    GetAll,\n"));
        assert!(code.contains("            Self::GetAll => \"GET_ALL\",\n"));
        assert!(code.contains("            Self::Unrecognized => \"$UNKNOWN\",\n"));
        assert!(code.contains("            \"FRIENDLY\" => Self::Friendly,\n"));
        assert!(code.contains("            _ => Self::Unrecognized,\n"));
    }

    #[test]
    fn test_symbol_clashing_with_fallback() {
        let err = generate(&["UNRECOGNIZED"]).unwrap_err();
        assert!(err.to_string().contains("renders 'Unrecognized' more than once"));
    }

    #[test]
    fn test_symbols_rendering_to_one_variant() {
        assert!(generate(&["GET_ALL", "GETALL"]).is_ok());
        assert!(generate(&["GET_ALL", "GET__ALL"]).is_err());
    }
}
