//! Rust names and type expressions shared by the generators.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use ironrest_schema::{FieldType, Identifier, PrimitiveType, TypeRegistry, to_snake_case};
use std::collections::BTreeSet;

/// Alias under which generated files import the runtime crate.
pub const RUNTIME_ALIAS: &str = "rt";

/// Names a generated type may not take because generated code uses them
/// unqualified.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Box", "Err", "None", "Ok", "Option", "Self", "Some", "String", "Vec",
];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "super"];

/// Escapes a name that is a Rust keyword.
#[must_use]
pub fn rust_ident(name: &str) -> String {
    if PATH_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Returns the struct field identifier of a schema field.
#[must_use]
pub fn field_ident(field_name: &str) -> String {
    rust_ident(&to_snake_case(field_name))
}

/// Returns the local variable holding a field while a record is read.
#[must_use]
pub fn field_local(field_name: &str) -> String {
    format!("{}_value", to_snake_case(field_name))
}

/// Returns the module identifier of a namespace segment or file stem.
#[must_use]
pub fn module_ident(segment: &str) -> String {
    rust_ident(&to_snake_case(segment))
}

/// Returns the name of the required-fields constant of a record.
#[must_use]
pub fn required_fields_const(rendered_name: &str) -> String {
    format!("{}_REQUIRED_FIELDS", to_snake_case(rendered_name).to_uppercase())
}

/// Rejects names generated code cannot use for a type or variant.
///
/// # Errors
/// Returns `CodegenError::Generation` if the name is reserved.
pub fn check_type_name(name: &str, owner: &Identifier) -> Result<(), CodegenError> {
    if RESERVED_TYPE_NAMES.contains(&name) {
        return Err(CodegenError::generation(format!(
            "'{owner}' renders the reserved name '{name}'"
        )));
    }
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CodegenError::generation(format!(
            "'{owner}' renders the invalid name '{name}'"
        )));
    }
    Ok(())
}

/// Rejects names generated code cannot use for an enum variant.
///
/// # Errors
/// Returns `CodegenError::Generation` if the name is not a valid variant.
pub fn check_variant_name(name: &str, owner: &Identifier) -> Result<(), CodegenError> {
    if name == "Self" || name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CodegenError::generation(format!(
            "'{owner}' renders the invalid variant '{name}'"
        )));
    }
    Ok(())
}

/// Rejects identifiers that appear twice in one generated item.
///
/// # Errors
/// Returns `CodegenError::Generation` naming the first duplicate.
pub fn check_unique<'n>(
    names: impl IntoIterator<Item = &'n str>,
    owner: &Identifier,
) -> Result<(), CodegenError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CodegenError::generation(format!(
                "'{owner}' renders '{name}' more than once"
            )));
        }
    }
    Ok(())
}

/// Appends `///` lines for a doc string.
pub fn push_doc(output: &mut String, doc: Option<&str>, indent: &str) {
    let Some(doc) = doc else {
        return;
    };
    for line in doc.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}

/// Renders Rust type expressions for schema types.
pub struct TypeRenderer<'a> {
    registry: &'a TypeRegistry,
    config: &'a GeneratorConfig,
}

impl<'a> TypeRenderer<'a> {
    /// Creates a new renderer.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry, config: &'a GeneratorConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Returns the module path of a namespace.
    #[must_use]
    pub fn namespace_path(&self, id: &Identifier) -> String {
        let mut path = self.config.package_prefix().to_string();
        for segment in id.namespace_segments() {
            path.push_str("::");
            path.push_str(&module_ident(segment));
        }
        path
    }

    /// Returns the fully qualified path of a generated type.
    ///
    /// Cyclic types are re-exported from their namespace module, so the
    /// namespace path reaches them as well.
    #[must_use]
    pub fn type_path(&self, id: &Identifier) -> String {
        format!(
            "{}::{}",
            self.namespace_path(id),
            self.registry.rendered_name(id)
        )
    }

    /// Returns the type of a field embedding `field_type` directly.
    ///
    /// References that require indirection are boxed.
    #[must_use]
    pub fn field_type(&self, field_type: &FieldType) -> String {
        match field_type {
            FieldType::Reference(id) if self.registry.should_use_indirection(id) => {
                format!("Box<{}>", self.type_path(id))
            }
            other => self.element_type(other),
        }
    }

    /// Returns the type of a value held inside a container.
    ///
    /// Containers already provide indirection, so nothing is boxed.
    #[must_use]
    pub fn element_type(&self, field_type: &FieldType) -> String {
        match field_type {
            FieldType::Primitive(PrimitiveType::Bytes) => format!("{RUNTIME_ALIAS}::Bytes"),
            FieldType::Primitive(primitive) => primitive.rust_type().to_string(),
            FieldType::Reference(id) => self.type_path(id),
            FieldType::Array(items) => format!("Vec<{}>", self.element_type(items)),
            FieldType::Map(values) => format!(
                "{RUNTIME_ALIAS}::IndexMap<String, {}>",
                self.element_type(values)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironrest_schema::{ComplexType, Field, NamedType, RecordDef};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for (name, refs) in [("Node", vec!["Node"]), ("Leaf", vec![])] {
            registry
                .register(
                    ComplexType::Record(RecordDef {
                        named: NamedType::new(Identifier::new("com.example.type", name)),
                        fields: refs
                            .into_iter()
                            .map(|r| Field::optional("next", FieldType::reference("com.example.type", r)))
                            .collect(),
                    }),
                    "api",
                )
                .unwrap();
        }
        registry.finalize().unwrap();
        registry
    }

    #[test]
    fn test_rust_ident() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("greeting"), "greeting");
        assert_eq!(field_ident("versionSuffix"), "version_suffix");
        assert_eq!(field_ident("match"), "r#match");
        assert_eq!(field_local("type"), "type_value");
    }

    #[test]
    fn test_required_fields_const() {
        assert_eq!(
            required_fields_const("ExtensionSchemaAnnotation"),
            "EXTENSION_SCHEMA_ANNOTATION_REQUIRED_FIELDS"
        );
    }

    #[test]
    fn test_type_expressions() {
        let registry = registry();
        let config = GeneratorConfig::default();
        let types = TypeRenderer::new(&registry, &config);
        let node = FieldType::reference("com.example.type", "Node");
        let leaf = FieldType::reference("com.example.type", "Leaf");

        assert_eq!(
            types.field_type(&node),
            "Box<crate::generated::com::example::r#type::Node>"
        );
        assert_eq!(types.field_type(&leaf), "crate::generated::com::example::r#type::Leaf");
        assert_eq!(
            types.field_type(&FieldType::array(node)),
            "Vec<crate::generated::com::example::r#type::Node>"
        );
        assert_eq!(
            types.field_type(&FieldType::map(FieldType::Primitive(PrimitiveType::Bytes))),
            "rt::IndexMap<String, rt::Bytes>"
        );
    }

    #[test]
    fn test_check_names() {
        let owner = Identifier::new("pkg", "Option");
        assert!(check_type_name("Option", &owner).is_err());
        assert!(check_type_name("Greeting", &owner).is_ok());
        assert!(check_variant_name("String", &owner).is_ok());
        assert!(check_variant_name("Self", &owner).is_err());
        assert!(check_unique(["a", "b", "a"], &owner).is_err());
        assert!(check_unique(["a", "b"], &owner).is_ok());
    }
}
