//! Rendered names and conflict remediation.
//!
//! Cyclic types of one package root are generated into a single shared
//! module, so their rendered names must be unique within the root. Types
//! whose names only differ by case collide once rendered; each of them is
//! renamed by prefixing the last segment of its namespace.

use crate::error::SchemaError;
use crate::identifier::Identifier;
use crate::registry::TypeRegistry;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Computes the overrides that make cyclic type names unique per root.
///
/// Non-cyclic types are never renamed.
///
/// # Errors
/// Returns `SchemaError::NameCollision` if two types of a root would still
/// be rendered under the same name.
pub fn remediate(registry: &TypeRegistry) -> Result<BTreeMap<Identifier, String>, SchemaError> {
    let mut overrides = BTreeMap::new();

    for (root, ids) in registry.package_roots() {
        let mut groups: BTreeMap<String, Vec<&Identifier>> = BTreeMap::new();
        for id in ids.iter().filter(|id| registry.is_cyclic(id)) {
            groups
                .entry(to_pascal_case(id.name()).to_lowercase())
                .or_default()
                .push(id);
        }

        let mut rendered: BTreeMap<String, &Identifier> = BTreeMap::new();
        for members in groups.values().filter(|m| m.len() == 1) {
            rendered.insert(to_pascal_case(members[0].name()), members[0]);
        }

        for members in groups.values().filter(|m| m.len() > 1) {
            let names: Vec<String> = members.iter().map(|id| id.full_name()).collect();
            warn!(package_root = %root, "types have conflicting names: {}", names.join(", "));

            let mut targets: BTreeMap<String, &Identifier> = BTreeMap::new();
            for &id in members {
                let target = override_name(id);
                if let Some(&other) = targets.get(&target) {
                    return Err(SchemaError::NameCollision {
                        type_a: other.clone(),
                        type_b: id.clone(),
                        target,
                    });
                }
                info!("conflicting type '{id}' renamed to '{}.{target}'", id.namespace());
                targets.insert(target.clone(), id);
                overrides.insert(id.clone(), target);
            }

            for (target, id) in targets {
                if let Some(&other) = rendered.get(&target) {
                    return Err(SchemaError::NameCollision {
                        type_a: other.clone(),
                        type_b: id.clone(),
                        target,
                    });
                }
                rendered.insert(target, id);
            }
        }
    }

    Ok(overrides)
}

/// Returns the override for a type: its capitalized last namespace segment
/// followed by its name as declared.
///
/// The name keeps its case so that `Node` and `node` stay distinct.
#[must_use]
pub fn override_name(id: &Identifier) -> String {
    format!("{}{}", capitalize(id.last_namespace_segment()), id.name())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a string to snake_case.
///
/// Runs of capitals are kept together: `HTTPStatus` becomes `http_status`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '.' {
            result.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
