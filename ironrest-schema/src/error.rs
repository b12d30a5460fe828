//! Error types for descriptor loading and registry finalization.

use crate::identifier::{Identifier, Path};
use thiserror::Error;

/// Error type for descriptor loading operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid field type reference.
    #[error("invalid field type '{type_name}' in '{context}'")]
    InvalidFieldType {
        /// Type name as written.
        type_name: String,
        /// Type or field the reference appears in.
        context: String,
    },

    /// Invalid descriptor structure.
    #[error("invalid descriptor structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for registry finalization.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A type with the same identifier is already registered.
    #[error("'{identifier}' has already been registered in package root '{package_root}'")]
    DuplicateRegistration {
        /// Identifier being registered.
        identifier: Identifier,
        /// Package root of the existing registration.
        package_root: String,
    },

    /// A type references an identifier that was never registered.
    #[error("'{dependent}' depends on unknown type '{missing}'")]
    UnresolvedDependency {
        /// Type holding the reference.
        dependent: Identifier,
        /// Referenced identifier.
        missing: Identifier,
    },

    /// A reference cycle spans more than one package root.
    #[error(
        "cyclic dependency between package roots cannot be remediated since the types are defined in different roots: {path}"
    )]
    CrossRootCycle {
        /// Chain of types forming the cycle, starting and ending on the same type.
        path: Path,
    },

    /// Two cyclic types would be rendered under the same name.
    #[error("cannot rename '{type_b}' to '{target}' as it would conflict with '{type_a}'")]
    NameCollision {
        /// Type that already holds the name.
        type_a: Identifier,
        /// Type that was being renamed.
        type_b: Identifier,
        /// Colliding rendered name.
        target: String,
    },

    /// A descriptor is structurally invalid.
    #[error("invalid type '{identifier}': {message}")]
    InvalidType {
        /// Offending type.
        identifier: Identifier,
        /// Error message.
        message: String,
    },
}

impl ParseError {
    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Creates an invalid field type error.
    pub fn invalid_field_type(type_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::InvalidFieldType {
            type_name: type_name.into(),
            context: context.into(),
        }
    }
}

impl SchemaError {
    /// Creates an invalid type error.
    pub fn invalid_type(identifier: &Identifier, message: impl Into<String>) -> Self {
        Self::InvalidType {
            identifier: identifier.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_root_cycle_display() {
        let path = Path::from(vec![
            Identifier::new("pkg1", "A"),
            Identifier::new("pkg2", "B"),
            Identifier::new("pkg1", "A"),
        ]);
        let err = SchemaError::CrossRootCycle { path };
        assert!(err.to_string().ends_with(": pkg1.A -> pkg2.B -> pkg1.A"));
    }

    #[test]
    fn test_unresolved_dependency_display() {
        let err = SchemaError::UnresolvedDependency {
            dependent: Identifier::new("com.example", "Greeting"),
            missing: Identifier::new("com.example", "Tone"),
        };
        assert_eq!(
            err.to_string(),
            "'com.example.Greeting' depends on unknown type 'com.example.Tone'"
        );
    }

    #[test]
    fn test_parse_error_converts() {
        let err: SchemaError = ParseError::invalid_structure("empty name").into();
        assert!(matches!(err, SchemaError::Parse(ParseError::InvalidStructure { .. })));
    }
}
