//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use ironrest::prelude::*;
//! ```

// Runtime types
pub use ironrest_core::error::{CodecError, Result as CodecResult};
pub use ironrest_core::{
    Bytes, ComputeHash, Hash, IndexMap, Marshal, PartialUpdate, PatchFieldChecker, RawPartialUpdate,
    RawRecord, RecordWriter, RequiredFields, Unmarshal, Value, from_json, from_ror2,
    marshal_partial_update, to_json, to_ror2, unmarshal_partial_update,
};

// Schema types
pub use ironrest_schema::{
    ComplexType, Field, FieldType, Identifier, Path, PrimitiveType, SchemaError, TypeRegistry,
    load_into, parse_descriptors,
};

// Codegen types
pub use ironrest_codegen::{CodeFile, CodegenError, Generator, GeneratorConfig};
