//! # IronRest Codegen
//!
//! Rust code generation from IronRest type registries.
//!
//! This crate provides:
//! - Record, complex key, union, typeref, enum and fixed generation
//! - Partial-update types for every record
//! - Namespace module layout with shared modules for cyclic types
//! - File output with a "do not edit" header

pub mod code_file;
pub mod config;
pub mod error;
pub mod generator;
pub mod rust;

pub use code_file::CodeFile;
pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use error::CodegenError;
pub use generator::Generator;

use ironrest_schema::{TypeRegistry, load_into};
use std::path::Path;

/// Generates code from descriptor documents.
///
/// # Arguments
/// * `sources` - Pairs of package root and descriptor document text
/// * `config` - Generator configuration
///
/// # Returns
/// The generated files; nothing is written.
///
/// # Errors
/// Returns `CodegenError` if parsing, registry finalization, or generation
/// fails.
pub fn generate_from_descriptors(
    sources: &[(&str, &str)],
    config: GeneratorConfig,
) -> Result<Vec<CodeFile>, CodegenError> {
    let mut registry = TypeRegistry::new();
    for (package_root, json) in sources {
        load_into(&mut registry, json, package_root)?;
    }
    registry.finalize()?;
    Generator::new(&registry, config)?.generate()
}

/// Generates code from descriptor files.
///
/// # Arguments
/// * `sources` - Pairs of package root and descriptor file path
/// * `config` - Generator configuration
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_files(
    sources: &[(&str, &Path)],
    config: GeneratorConfig,
) -> Result<Vec<CodeFile>, CodegenError> {
    let documents = sources
        .iter()
        .map(|(root, path)| -> Result<(&str, String), CodegenError> {
            Ok((*root, std::fs::read_to_string(path)?))
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;
    let borrowed: Vec<(&str, &str)> = documents
        .iter()
        .map(|(root, json)| (*root, json.as_str()))
        .collect();
    generate_from_descriptors(&borrowed, config)
}
