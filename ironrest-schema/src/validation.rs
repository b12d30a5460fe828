//! Registry validation.
//!
//! This module checks that a registry forms a complete model before cycle
//! analysis runs: every reference resolves and each descriptor is
//! structurally sound.

use crate::error::SchemaError;
use crate::identifier::Identifier;
use crate::registry::TypeRegistry;
use crate::types::{ComplexType, EnumDef, FieldType, RecordDef, UnionDef};
use std::collections::{BTreeSet, HashSet};

/// Symbol reserved for values an older reader does not know.
pub const UNKNOWN_ENUM_SYMBOL: &str = "$UNKNOWN";

/// Validates a registry for completeness and structural correctness.
///
/// # Arguments
/// * `registry` - The registry to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the first issue.
///
/// # Errors
/// Returns `SchemaError::UnresolvedDependency` if a reference does not
/// resolve, or `SchemaError::InvalidType` if a descriptor is malformed.
pub fn validate_registry(registry: &TypeRegistry) -> Result<(), SchemaError> {
    validate_dependencies(registry)?;
    for (_, registered) in registry.iter() {
        validate_type(registry, registered.descriptor())?;
    }
    Ok(())
}

/// Validates that every referenced identifier is registered.
fn validate_dependencies(registry: &TypeRegistry) -> Result<(), SchemaError> {
    for (id, registered) in registry.iter() {
        for dep in registered.descriptor().references() {
            if !registry.contains(dep) {
                return Err(SchemaError::UnresolvedDependency {
                    dependent: id.clone(),
                    missing: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Validates a single descriptor.
fn validate_type(registry: &TypeRegistry, descriptor: &ComplexType) -> Result<(), SchemaError> {
    match descriptor {
        ComplexType::Record(record) => validate_record(record),
        ComplexType::ComplexKey(key) => {
            for part in [&key.key, &key.params] {
                if !matches!(registry.resolve(part), ComplexType::Record(_)) {
                    return Err(SchemaError::invalid_type(
                        &key.named.identifier,
                        format!("complex key part '{part}' is not a record"),
                    ));
                }
            }
            Ok(())
        }
        ComplexType::Union(union) => validate_union(union),
        ComplexType::Typeref(typeref) => validate_typeref_chain(registry, &typeref.named.identifier),
        ComplexType::Enum(enum_def) => validate_enum(enum_def),
        ComplexType::Fixed(fixed) => {
            if fixed.size == 0 {
                return Err(SchemaError::invalid_type(
                    &fixed.named.identifier,
                    "fixed size must be greater than zero",
                ));
            }
            Ok(())
        }
    }
}

/// Validates a record definition.
fn validate_record(record: &RecordDef) -> Result<(), SchemaError> {
    let mut seen_names = HashSet::new();
    for field in &record.fields {
        if field.name.is_empty() {
            return Err(SchemaError::invalid_type(
                &record.named.identifier,
                "field with empty name",
            ));
        }
        if !seen_names.insert(&field.name) {
            return Err(SchemaError::invalid_type(
                &record.named.identifier,
                format!("duplicate field name '{}'", field.name),
            ));
        }
    }
    Ok(())
}

/// Validates a union definition.
fn validate_union(union: &UnionDef) -> Result<(), SchemaError> {
    if union.members.is_empty() {
        return Err(SchemaError::invalid_type(
            &union.named.identifier,
            "union has no members",
        ));
    }

    let mut seen_keys = HashSet::new();
    for member in &union.members {
        let key = member.member_key();
        if !seen_keys.insert(key.clone()) {
            return Err(SchemaError::invalid_type(
                &union.named.identifier,
                format!("duplicate union member '{key}'"),
            ));
        }
    }
    Ok(())
}

/// Validates an enum definition.
fn validate_enum(enum_def: &EnumDef) -> Result<(), SchemaError> {
    if enum_def.symbols.is_empty() {
        return Err(SchemaError::invalid_type(
            &enum_def.named.identifier,
            "enum has no symbols",
        ));
    }

    let mut seen_names = HashSet::new();
    for symbol in &enum_def.symbols {
        if symbol == UNKNOWN_ENUM_SYMBOL {
            return Err(SchemaError::invalid_type(
                &enum_def.named.identifier,
                format!("symbol '{UNKNOWN_ENUM_SYMBOL}' is reserved"),
            ));
        }
        if !seen_names.insert(symbol.to_lowercase()) {
            return Err(SchemaError::invalid_type(
                &enum_def.named.identifier,
                format!("duplicate enum symbol '{symbol}'"),
            ));
        }
    }
    Ok(())
}

/// Rejects typerefs that alias themselves through other typerefs.
fn validate_typeref_chain(registry: &TypeRegistry, start: &Identifier) -> Result<(), SchemaError> {
    let mut seen = BTreeSet::new();
    let mut current = start;
    while let ComplexType::Typeref(typeref) = registry.resolve(current) {
        if !seen.insert(current) {
            return Err(SchemaError::invalid_type(
                start,
                format!("typeref chain through '{current}' never reaches a concrete type"),
            ));
        }
        match &typeref.target {
            FieldType::Reference(target) => current = target,
            _ => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ComplexKeyDef, Field, FixedDef, NamedType, PrimitiveType, TyperefDef, UnionMember,
    };

    fn named(name: &str) -> NamedType {
        NamedType::new(Identifier::new("pkg", name))
    }

    fn validate(types: Vec<ComplexType>) -> Result<(), SchemaError> {
        let mut registry = TypeRegistry::new();
        for descriptor in types {
            registry.register(descriptor, "pkg")?;
        }
        validate_registry(&registry)
    }

    fn int() -> FieldType {
        FieldType::Primitive(PrimitiveType::Int)
    }

    #[test]
    fn test_valid_registry() {
        let result = validate(vec![
            ComplexType::Record(RecordDef {
                named: named("Key"),
                fields: vec![Field::required("id", int())],
            }),
            ComplexType::Record(RecordDef {
                named: named("Params"),
                fields: vec![],
            }),
            ComplexType::ComplexKey(ComplexKeyDef {
                named: named("ComplexKey"),
                key: Identifier::new("pkg", "Key"),
                params: Identifier::new("pkg", "Params"),
            }),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_every_reference_must_resolve() {
        let err = validate(vec![ComplexType::Typeref(TyperefDef {
            named: named("Alias"),
            target: FieldType::array(FieldType::reference("pkg", "Missing")),
        })])
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedDependency { .. }));
    }

    #[test]
    fn test_duplicate_field_name() {
        let err = validate(vec![ComplexType::Record(RecordDef {
            named: named("R"),
            fields: vec![Field::required("id", int()), Field::optional("id", int())],
        })])
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid type 'pkg.R': duplicate field name 'id'");
    }

    #[test]
    fn test_enum_symbols() {
        let enum_of = |symbols: &[&str]| {
            ComplexType::Enum(EnumDef {
                named: named("E"),
                symbols: symbols.iter().map(|s| (*s).to_string()).collect(),
            })
        };
        assert!(validate(vec![enum_of(&["A", "B"])]).is_ok());
        assert!(validate(vec![enum_of(&[])]).is_err());
        assert!(validate(vec![enum_of(&["A", "a"])]).is_err());
        assert!(validate(vec![enum_of(&["$UNKNOWN"])]).is_err());
    }

    #[test]
    fn test_zero_size_fixed() {
        let err = validate(vec![ComplexType::Fixed(FixedDef {
            named: named("F"),
            size: 0,
        })])
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType { .. }));
    }

    #[test]
    fn test_union_members() {
        let union_of = |members: Vec<UnionMember>| {
            ComplexType::Union(UnionDef {
                named: named("U"),
                members,
            })
        };
        assert!(validate(vec![union_of(vec![])]).is_err());
        let member = UnionMember {
            alias: None,
            member_type: int(),
        };
        assert!(validate(vec![union_of(vec![member.clone(), member])]).is_err());
    }

    #[test]
    fn test_complex_key_parts_must_be_records() {
        let err = validate(vec![
            ComplexType::Fixed(FixedDef {
                named: named("F"),
                size: 4,
            }),
            ComplexType::ComplexKey(ComplexKeyDef {
                named: named("K"),
                key: Identifier::new("pkg", "F"),
                params: Identifier::new("pkg", "F"),
            }),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("is not a record"));
    }

    #[test]
    fn test_typeref_loop() {
        let err = validate(vec![
            ComplexType::Typeref(TyperefDef {
                named: named("A"),
                target: FieldType::reference("pkg", "B"),
            }),
            ComplexType::Typeref(TyperefDef {
                named: named("B"),
                target: FieldType::reference("pkg", "A"),
            }),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("never reaches a concrete type"));
    }
}
