//! # IronRest Schema
//!
//! Type registry and dependency graph for IronRest code generation.
//!
//! This crate provides:
//! - Type descriptors for records, complex keys, unions, typerefs, enums and fixed types
//! - A JSON descriptor front-end
//! - The type registry, with completeness and structural validation
//! - Cycle analysis classifying package-internal and cross-root cycles
//! - Remediation of colliding rendered names

pub mod cycles;
pub mod error;
pub mod identifier;
pub mod loader;
pub mod naming;
pub mod registry;
pub mod types;
pub mod validation;

pub use cycles::{CycleAnalysis, analyze};
pub use error::{ParseError, SchemaError};
pub use identifier::{Identifier, IdentifierSet, Path};
pub use loader::{ParsedDescriptors, load_into, parse_descriptors};
pub use naming::{override_name, remediate, to_pascal_case, to_snake_case};
pub use registry::{RegisteredType, TypeRegistry};
pub use types::{
    ComplexKeyDef, ComplexType, EnumDef, Field, FieldType, FixedDef, NamedType, PrimitiveType,
    RecordDef, ReferencePolicy, TyperefDef, UnionDef, UnionMember,
};
pub use validation::{UNKNOWN_ENUM_SYMBOL, validate_registry};
