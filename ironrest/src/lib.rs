//! # IronRest
//!
//! Schema-driven code generator and wire-codec runtime for typed REST
//! records.
//!
//! IronRest builds a registry of declared types, checks it for completeness,
//! classifies cyclic references and renames colliding types, then emits Rust
//! code implementing a fixed codec contract for each type.
//!
//! ## Features
//!
//! - **Type registry** - Resolution, package-root tracking and validation
//! - **Cycle analysis** - Package-internal cycles are boxed, cross-root cycles are rejected
//! - **Codec contract** - Marshal/unmarshal, deterministic hashing, equality
//! - **Partial updates** - Patches with mutually exclusive `$delete`/`$set` sections
//! - **Two text forms** - Compact JSON and URL-safe ROR2
//!
//! ## Quick Start
//!
//! ```ignore
//! use ironrest::prelude::*;
//!
//! let config = GeneratorConfig::builder().output_dir("src/generated").build();
//! let written = ironrest::generate(&[("api", descriptors)], config)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Value model, text forms, codec traits, patches
//! - [`schema`] - Identifiers, descriptors, registry, cycle analysis
//! - [`codegen`] - Rust code generation and file output

pub mod prelude;

/// Wire-codec runtime used by generated code.
pub mod core {
    pub use ironrest_core::*;
}

/// Type registry and dependency graph.
pub mod schema {
    pub use ironrest_schema::*;
}

/// Code generation from finalized registries.
pub mod codegen {
    pub use ironrest_codegen::*;
}

// Re-export commonly used items at the crate root
pub use ironrest_codegen::{CodegenError, Generator, GeneratorConfig};
pub use ironrest_core::{CodecError, ComputeHash, Marshal, PartialUpdate, Unmarshal, Value};
pub use ironrest_schema::{Identifier, SchemaError, TypeRegistry};

use std::path::PathBuf;
use tracing::info;

/// Runs the whole pipeline: load, finalize, generate and write.
///
/// # Arguments
/// * `sources` - Pairs of package root and descriptor document text
/// * `config` - Generator configuration, including the output directory
///
/// # Returns
/// The paths written.
///
/// # Errors
/// Returns `CodegenError` if a document is malformed, the registry fails to
/// finalize, or generation fails; no file is written in those cases. Also
/// returns `CodegenError::Io` if writing fails.
pub fn generate(
    sources: &[(&str, &str)],
    config: GeneratorConfig,
) -> Result<Vec<PathBuf>, CodegenError> {
    let mut registry = TypeRegistry::new();
    for (package_root, json) in sources {
        ironrest_schema::load_into(&mut registry, json, package_root)?;
    }
    registry.finalize()?;

    let paths = Generator::new(&registry, config)?.write_all()?;
    info!(
        documents = sources.len(),
        files = paths.len(),
        "generation complete"
    );
    Ok(paths)
}
