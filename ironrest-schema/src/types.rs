//! Type descriptors.
//!
//! This module contains the closed set of schema constructs the generator
//! understands: records, complex keys, standalone unions, typerefs, enums and
//! fixed-size byte strings.

use crate::identifier::{Identifier, IdentifierSet};

/// Schema primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Boolean.
    Boolean,
    /// UTF-8 string.
    String,
    /// Byte string.
    Bytes,
}

impl PrimitiveType {
    /// Returns the Rust type name for this primitive.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::Int => "i32",
            Self::Long => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::Boolean => "bool",
            Self::String => "String",
            Self::Bytes => "Bytes",
        }
    }

    /// Returns the schema type name.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Parses a schema type name.
    #[must_use]
    pub fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            "bytes" => Some(Self::Bytes),
            _ => None,
        }
    }
}

/// Type of a field, union member or typeref target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A primitive.
    Primitive(PrimitiveType),
    /// A named type.
    Reference(Identifier),
    /// An array of items.
    Array(Box<FieldType>),
    /// A string-keyed map of values.
    Map(Box<FieldType>),
}

impl FieldType {
    /// Creates an array type.
    #[must_use]
    pub fn array(items: FieldType) -> Self {
        Self::Array(Box::new(items))
    }

    /// Creates a map type.
    #[must_use]
    pub fn map(values: FieldType) -> Self {
        Self::Map(Box::new(values))
    }

    /// Creates a reference to a named type.
    #[must_use]
    pub fn reference(namespace: &str, name: &str) -> Self {
        Self::Reference(Identifier::new(namespace, name))
    }

    /// Collects every named type reachable through arrays and maps.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a Identifier>) {
        match self {
            Self::Primitive(_) => {}
            Self::Reference(id) => out.push(id),
            Self::Array(items) | Self::Map(items) => items.collect_references(out),
        }
    }

    /// Returns the referenced type if this is a direct reference.
    #[must_use]
    pub fn as_reference(&self) -> Option<&Identifier> {
        match self {
            Self::Reference(id) => Some(id),
            _ => None,
        }
    }
}

/// Name, origin and documentation shared by every descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Type identifier.
    pub identifier: Identifier,
    /// Schema file the type was declared in.
    pub source_file: String,
    /// Documentation.
    pub doc: Option<String>,
}

impl NamedType {
    /// Creates a named type with no source file or documentation.
    #[must_use]
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            source_file: String::new(),
            doc: None,
        }
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    /// Sets the documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Wire name.
    pub name: String,
    /// Field type.
    pub field_type: FieldType,
    /// Whether the field may be absent.
    pub optional: bool,
    /// Documentation.
    pub doc: Option<String>,
}

impl Field {
    /// Creates a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: false,
            doc: None,
        }
    }

    /// Creates an optional field.
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            optional: true,
            ..Self::required(name, field_type)
        }
    }
}

/// Record type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    /// Name and origin.
    pub named: NamedType,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl RecordDef {
    /// Returns the fields sorted by wire name, the order they are marshalled in.
    #[must_use]
    pub fn sorted_fields(&self) -> Vec<&Field> {
        let mut fields: Vec<&Field> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields
    }

    /// Returns the required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.optional)
    }
}

/// Complex key: a key record together with a params record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexKeyDef {
    /// Name and origin.
    pub named: NamedType,
    /// Key record.
    pub key: Identifier,
    /// Params record.
    pub params: Identifier,
}

/// Union member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionMember {
    /// Explicit member alias.
    pub alias: Option<String>,
    /// Member type.
    pub member_type: FieldType,
}

impl UnionMember {
    /// Returns the key this member is written under on the wire.
    #[must_use]
    pub fn member_key(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        match &self.member_type {
            FieldType::Primitive(p) => p.schema_name().to_string(),
            FieldType::Reference(id) => id.full_name(),
            FieldType::Array(_) => "array".to_string(),
            FieldType::Map(_) => "map".to_string(),
        }
    }
}

/// Standalone union type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDef {
    /// Name and origin.
    pub named: NamedType,
    /// Members in declaration order.
    pub members: Vec<UnionMember>,
}

/// Typeref (alias) type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyperefDef {
    /// Name and origin.
    pub named: NamedType,
    /// Aliased type.
    pub target: FieldType,
}

/// Enum type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// Name and origin.
    pub named: NamedType,
    /// Symbols in declaration order.
    pub symbols: Vec<String>,
}

/// Fixed-size byte string type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDef {
    /// Name and origin.
    pub named: NamedType,
    /// Size in bytes.
    pub size: usize,
}

/// How embedding types must refer to a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Always embedded by value.
    Never,
    /// Embedded through indirection when the type is cyclic.
    WhenCyclic,
    /// Follows the policy of another type (typerefs to named types).
    Delegate(Identifier),
}

/// Type descriptor variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexType {
    /// Record.
    Record(RecordDef),
    /// Complex key.
    ComplexKey(ComplexKeyDef),
    /// Standalone union.
    Union(UnionDef),
    /// Typeref.
    Typeref(TyperefDef),
    /// Enum.
    Enum(EnumDef),
    /// Fixed-size byte string.
    Fixed(FixedDef),
}

impl ComplexType {
    /// Returns the shared name and origin.
    #[must_use]
    pub fn named(&self) -> &NamedType {
        match self {
            Self::Record(r) => &r.named,
            Self::ComplexKey(k) => &k.named,
            Self::Union(u) => &u.named,
            Self::Typeref(t) => &t.named,
            Self::Enum(e) => &e.named,
            Self::Fixed(f) => &f.named,
        }
    }

    /// Returns the identifier of the type.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.named().identifier
    }

    /// Returns the schema file the type was declared in.
    #[must_use]
    pub fn source_file(&self) -> &str {
        &self.named().source_file
    }

    /// Returns the documentation.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.named().doc.as_deref()
    }

    /// Returns a short name for the kind of type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::ComplexKey(_) => "complex key",
            Self::Union(_) => "union",
            Self::Typeref(_) => "typeref",
            Self::Enum(_) => "enum",
            Self::Fixed(_) => "fixed",
        }
    }

    /// Returns the directly referenced types, sorted and deduplicated.
    #[must_use]
    pub fn references(&self) -> Vec<&Identifier> {
        let mut refs = Vec::new();
        match self {
            Self::Record(r) => {
                for field in &r.fields {
                    field.field_type.collect_references(&mut refs);
                }
            }
            Self::ComplexKey(k) => {
                refs.push(&k.key);
                refs.push(&k.params);
            }
            Self::Union(u) => {
                for member in &u.members {
                    member.member_type.collect_references(&mut refs);
                }
            }
            Self::Typeref(t) => t.target.collect_references(&mut refs),
            Self::Enum(_) | Self::Fixed(_) => {}
        }
        refs.sort();
        refs.dedup();
        refs
    }

    /// Returns the directly referenced types as an owned set.
    #[must_use]
    pub fn inner_types(&self) -> IdentifierSet {
        self.references().into_iter().cloned().collect()
    }

    /// Returns the descriptor-level reference policy.
    #[must_use]
    pub fn reference_policy(&self) -> ReferencePolicy {
        match self {
            Self::Record(_) | Self::ComplexKey(_) | Self::Union(_) => ReferencePolicy::WhenCyclic,
            Self::Typeref(t) => match &t.target {
                FieldType::Reference(id) => ReferencePolicy::Delegate(id.clone()),
                _ => ReferencePolicy::WhenCyclic,
            },
            Self::Enum(_) | Self::Fixed(_) => ReferencePolicy::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(namespace: &str, name: &str, fields: Vec<Field>) -> ComplexType {
        ComplexType::Record(RecordDef {
            named: NamedType::new(Identifier::new(namespace, name)),
            fields,
        })
    }

    #[test]
    fn test_primitive_names() {
        for p in [
            PrimitiveType::Int,
            PrimitiveType::Long,
            PrimitiveType::Float,
            PrimitiveType::Double,
            PrimitiveType::Boolean,
            PrimitiveType::String,
            PrimitiveType::Bytes,
        ] {
            assert_eq!(PrimitiveType::from_schema_name(p.schema_name()), Some(p));
        }
        assert_eq!(PrimitiveType::from_schema_name("com.example.Foo"), None);
        assert_eq!(PrimitiveType::Long.rust_type(), "i64");
    }

    #[test]
    fn test_record_references_through_collections() {
        let r = record(
            "com.example",
            "Greeting",
            vec![
                Field::required("id", FieldType::Primitive(PrimitiveType::Long)),
                Field::optional("tones", FieldType::array(FieldType::reference("com.example", "Tone"))),
                Field::optional(
                    "byLang",
                    FieldType::map(FieldType::reference("com.example", "Tone")),
                ),
                Field::optional("sender", FieldType::reference("com.example", "Person")),
            ],
        );
        let inner = r.inner_types();
        assert_eq!(inner.len(), 2);
        assert!(inner.contains(&Identifier::new("com.example", "Tone")));
        assert!(inner.contains(&Identifier::new("com.example", "Person")));
    }

    #[test]
    fn test_sorted_and_required_fields() {
        let def = RecordDef {
            named: NamedType::new(Identifier::new("a", "R")),
            fields: vec![
                Field::required("zeta", FieldType::Primitive(PrimitiveType::Int)),
                Field::optional("alpha", FieldType::Primitive(PrimitiveType::Int)),
            ],
        };
        let sorted: Vec<&str> = def.sorted_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(sorted, ["alpha", "zeta"]);
        assert_eq!(def.required_fields().count(), 1);
    }

    #[test]
    fn test_reference_policy() {
        assert_eq!(
            record("a", "R", vec![]).reference_policy(),
            ReferencePolicy::WhenCyclic
        );
        let e = ComplexType::Enum(EnumDef {
            named: NamedType::new(Identifier::new("a", "E")),
            symbols: vec!["ONE".to_string()],
        });
        assert_eq!(e.reference_policy(), ReferencePolicy::Never);
        let t = ComplexType::Typeref(TyperefDef {
            named: NamedType::new(Identifier::new("a", "T")),
            target: FieldType::reference("a", "R"),
        });
        assert_eq!(
            t.reference_policy(),
            ReferencePolicy::Delegate(Identifier::new("a", "R"))
        );
    }

    #[test]
    fn test_union_member_keys() {
        let members = [
            UnionMember {
                alias: Some("text".to_string()),
                member_type: FieldType::Primitive(PrimitiveType::String),
            },
            UnionMember {
                alias: None,
                member_type: FieldType::Primitive(PrimitiveType::Int),
            },
            UnionMember {
                alias: None,
                member_type: FieldType::reference("com.example", "Tone"),
            },
            UnionMember {
                alias: None,
                member_type: FieldType::array(FieldType::Primitive(PrimitiveType::Int)),
            },
        ];
        let keys: Vec<String> = members.iter().map(UnionMember::member_key).collect();
        assert_eq!(keys, ["text", "int", "com.example.Tone", "array"]);
    }
}
