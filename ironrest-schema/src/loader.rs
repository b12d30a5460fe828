//! JSON descriptor front-end.
//!
//! Reads type declarations from a JSON document of the form:
//!
//! ```json
//! {
//!   "sourceFile": "schemas/com/example/Greeting.pdl",
//!   "types": [
//!     {"kind": "record", "name": "Greeting", "namespace": "com.example",
//!      "fields": [{"name": "id", "type": "long"},
//!                 {"name": "tone", "type": "Tone", "optional": true},
//!                 {"name": "tags", "type": {"array": "string"}, "optional": true}]},
//!     {"kind": "enum", "name": "Tone", "namespace": "com.example", "symbols": ["FRIENDLY", "SINCERE"]}
//!   ]
//! }
//! ```
//!
//! Type names without a dot resolve against the declaring type's namespace.

use crate::error::{ParseError, SchemaError};
use crate::identifier::Identifier;
use crate::registry::TypeRegistry;
use crate::types::{
    ComplexKeyDef, ComplexType, EnumDef, Field, FieldType, FixedDef, NamedType, PrimitiveType,
    RecordDef, TyperefDef, UnionDef, UnionMember,
};
use serde::Deserialize;
use tracing::info;

/// Descriptors read from one document.
#[derive(Debug, Clone, Default)]
pub struct ParsedDescriptors {
    /// Declared types in document order.
    pub types: Vec<ComplexType>,
    /// Typerefs declared as user-facing aliases.
    pub custom_typerefs: Vec<Identifier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorFile {
    #[serde(default)]
    source_file: String,
    types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    name: String,
    namespace: String,
    #[serde(default)]
    doc: Option<String>,
    #[serde(flatten)]
    body: TypeBody,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum TypeBody {
    Record {
        #[serde(default)]
        fields: Vec<FieldEntry>,
    },
    ComplexKey {
        key: String,
        params: String,
    },
    Union {
        members: Vec<MemberEntry>,
    },
    Typeref {
        #[serde(rename = "ref")]
        target: FieldTypeEntry,
        #[serde(default)]
        custom: bool,
    },
    Enum {
        symbols: Vec<String>,
    },
    Fixed {
        size: usize,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldTypeEntry {
    Named(String),
    Array { array: Box<FieldTypeEntry> },
    Map { map: Box<FieldTypeEntry> },
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldTypeEntry,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    doc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberEntry {
    #[serde(default)]
    alias: Option<String>,
    #[serde(rename = "type")]
    member_type: FieldTypeEntry,
}

/// Parses a descriptor document.
///
/// # Arguments
/// * `json` - The document text
///
/// # Errors
/// Returns `ParseError` if the document is malformed or a type reference
/// is invalid.
pub fn parse_descriptors(json: &str) -> Result<ParsedDescriptors, ParseError> {
    let file: DescriptorFile = serde_json::from_str(json)?;
    let mut parsed = ParsedDescriptors::default();

    for entry in file.types {
        let descriptor = convert_entry(entry, &file.source_file, &mut parsed.custom_typerefs)?;
        parsed.types.push(descriptor);
    }

    Ok(parsed)
}

/// Parses a descriptor document and registers every type it declares.
///
/// # Arguments
/// * `registry` - Registry to populate
/// * `json` - The document text
/// * `package_root` - Package root of all declared types
///
/// # Returns
/// The identifiers registered, in document order.
///
/// # Errors
/// Returns `SchemaError` if parsing fails or a type is already registered.
pub fn load_into(
    registry: &mut TypeRegistry,
    json: &str,
    package_root: &str,
) -> Result<Vec<Identifier>, SchemaError> {
    let parsed = parse_descriptors(json)?;
    let mut registered = Vec::with_capacity(parsed.types.len());
    for descriptor in parsed.types {
        registered.push(descriptor.identifier().clone());
        registry.register(descriptor, package_root)?;
    }
    for id in &parsed.custom_typerefs {
        registry.set_custom_typeref(id);
    }
    info!(package_root, types = registered.len(), "loaded descriptors");
    Ok(registered)
}

fn convert_entry(
    entry: TypeEntry,
    source_file: &str,
    custom_typerefs: &mut Vec<Identifier>,
) -> Result<ComplexType, ParseError> {
    if entry.name.is_empty() {
        return Err(ParseError::invalid_structure(format!(
            "type in namespace '{}' has an empty name",
            entry.namespace
        )));
    }
    let mut named = NamedType::new(Identifier::new(entry.namespace, entry.name))
        .with_source_file(source_file);
    named.doc = entry.doc;
    let owner = named.identifier.clone();

    let descriptor = match entry.body {
        TypeBody::Record { fields } => {
            let fields = fields
                .into_iter()
                .map(|f| -> Result<Field, ParseError> {
                    Ok(Field {
                        field_type: convert_field_type(f.field_type, &owner)?,
                        name: f.name,
                        optional: f.optional,
                        doc: f.doc,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ComplexType::Record(RecordDef { named, fields })
        }
        TypeBody::ComplexKey { key, params } => ComplexType::ComplexKey(ComplexKeyDef {
            key: resolve_name(&key, &owner)?,
            params: resolve_name(&params, &owner)?,
            named,
        }),
        TypeBody::Union { members } => {
            let members = members
                .into_iter()
                .map(|m| -> Result<UnionMember, ParseError> {
                    Ok(UnionMember {
                        alias: m.alias,
                        member_type: convert_field_type(m.member_type, &owner)?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ComplexType::Union(UnionDef { named, members })
        }
        TypeBody::Typeref { target, custom } => {
            if custom {
                custom_typerefs.push(owner.clone());
            }
            ComplexType::Typeref(TyperefDef {
                target: convert_field_type(target, &owner)?,
                named,
            })
        }
        TypeBody::Enum { symbols } => ComplexType::Enum(EnumDef { named, symbols }),
        TypeBody::Fixed { size } => ComplexType::Fixed(FixedDef { named, size }),
    };

    Ok(descriptor)
}

fn convert_field_type(entry: FieldTypeEntry, owner: &Identifier) -> Result<FieldType, ParseError> {
    match entry {
        FieldTypeEntry::Named(name) => match PrimitiveType::from_schema_name(&name) {
            Some(primitive) => Ok(FieldType::Primitive(primitive)),
            None => resolve_name(&name, owner).map(FieldType::Reference),
        },
        FieldTypeEntry::Array { array } => Ok(FieldType::array(convert_field_type(*array, owner)?)),
        FieldTypeEntry::Map { map } => Ok(FieldType::map(convert_field_type(*map, owner)?)),
    }
}

fn resolve_name(name: &str, owner: &Identifier) -> Result<Identifier, ParseError> {
    if name.is_empty() || name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return Err(ParseError::invalid_field_type(name, owner.full_name()));
    }
    if name.contains('.') {
        Ok(Identifier::parse(name))
    } else {
        Ok(Identifier::new(owner.namespace(), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = r#"{
        "sourceFile": "schemas/com/example/Greeting.pdl",
        "types": [
            {"kind": "record", "name": "Greeting", "namespace": "com.example", "doc": "A greeting.",
             "fields": [
                {"name": "id", "type": "long"},
                {"name": "tone", "type": "Tone", "optional": true},
                {"name": "tags", "type": {"array": "string"}, "optional": true},
                {"name": "byLang", "type": {"map": "com.example.common.Text"}, "optional": true}
             ]},
            {"kind": "enum", "name": "Tone", "namespace": "com.example", "symbols": ["FRIENDLY", "SINCERE"]},
            {"kind": "typeref", "name": "Url", "namespace": "com.example", "ref": "string", "custom": true},
            {"kind": "fixed", "name": "Md5", "namespace": "com.example", "size": 16},
            {"kind": "union", "name": "Body", "namespace": "com.example",
             "members": [{"type": "string"}, {"alias": "tone", "type": "Tone"}]},
            {"kind": "complexKey", "name": "GreetingKey", "namespace": "com.example",
             "key": "Greeting", "params": "com.example.common.Text"}
        ]
    }"#;

    #[test]
    fn test_parse_descriptors() {
        let parsed = parse_descriptors(GREETING).expect("Failed to parse");
        assert_eq!(parsed.types.len(), 6);
        assert_eq!(parsed.custom_typerefs, [Identifier::new("com.example", "Url")]);

        let ComplexType::Record(greeting) = &parsed.types[0] else {
            panic!("expected a record");
        };
        assert_eq!(greeting.named.source_file, "schemas/com/example/Greeting.pdl");
        assert_eq!(greeting.named.doc.as_deref(), Some("A greeting."));
        assert_eq!(greeting.fields.len(), 4);
        assert!(!greeting.fields[0].optional);
        assert_eq!(
            greeting.fields[1].field_type,
            FieldType::reference("com.example", "Tone")
        );
        assert_eq!(
            greeting.fields[3].field_type,
            FieldType::map(FieldType::reference("com.example.common", "Text"))
        );

        let ComplexType::Union(body) = &parsed.types[4] else {
            panic!("expected a union");
        };
        assert_eq!(body.members[0].member_key(), "string");
        assert_eq!(body.members[1].member_key(), "tone");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = parse_descriptors(r#"{"types": [{"kind": "service", "name": "S", "namespace": "x"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_invalid_type_name() {
        let err = parse_descriptors(
            r#"{"types": [{"kind": "typeref", "name": "T", "namespace": "x", "ref": "a..b"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidFieldType { ref type_name, .. } if type_name == "a..b"));
    }

    #[test]
    fn test_empty_name() {
        let err = parse_descriptors(r#"{"types": [{"kind": "fixed", "name": "", "namespace": "x", "size": 1}]}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_load_into_registers_and_marks_custom_typerefs() {
        let mut registry = TypeRegistry::new();
        let text = r#"{"types": [
            {"kind": "record", "name": "Text", "namespace": "com.example.common",
             "fields": [{"name": "value", "type": "string"}]}
        ]}"#;
        load_into(&mut registry, text, "common").unwrap();
        let ids = load_into(&mut registry, GREETING, "api").expect("Failed to load");
        assert_eq!(ids.len(), 6);
        assert!(registry.is_custom_typeref(&Identifier::new("com.example", "Url")));
        assert_eq!(registry.package_root(&Identifier::new("com.example", "Tone")), "api");
        registry.finalize().expect("Failed to finalize");

        let err = load_into(&mut registry, GREETING, "api").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateRegistration { .. }));
    }
}
