//! Main code generator.
//!
//! Lays out one file per type under its namespace directory. Cyclic types of
//! a package root share the `cyclic/<root>` module and are re-exported from
//! their namespace module, so every type is reachable at
//! `<prefix>::<namespace>::<Name>`.

use crate::code_file::CodeFile;
use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::rust::fields::{RUNTIME_ALIAS, check_type_name, module_ident, rust_ident};
use crate::rust::{
    ComplexKeyGenerator, EnumGenerator, RecordGenerator, TypeRenderer, TyperefGenerator,
    UnionGenerator,
};
use ironrest_schema::{ComplexType, Identifier, TypeRegistry};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// Directory holding the shared modules of cyclic types.
pub const CYCLIC_MODULE: &str = "cyclic";

/// Main code generator that coordinates all generation.
pub struct Generator<'a> {
    registry: &'a TypeRegistry,
    config: GeneratorConfig,
}

#[derive(Default)]
struct ModuleFile {
    children: BTreeSet<String>,
    files: BTreeSet<String>,
    reexports: BTreeSet<String>,
    source_files: BTreeSet<String>,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for a finalized registry.
    ///
    /// # Errors
    /// Returns `CodegenError::NotFinalized` if the registry changed since it
    /// was last finalized.
    pub fn new(registry: &'a TypeRegistry, config: GeneratorConfig) -> Result<Self, CodegenError> {
        if !registry.is_finalized() {
            return Err(CodegenError::NotFinalized);
        }
        Ok(Self { registry, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates every type file and the module files linking them.
    ///
    /// Nothing is written; any error aborts the whole run.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if a type cannot be rendered or
    /// two types would occupy the same name.
    pub fn generate(&self) -> Result<Vec<CodeFile>, CodegenError> {
        let types = TypeRenderer::new(self.registry, &self.config);
        let mut files = Vec::with_capacity(self.registry.len());
        let mut modules: BTreeMap<String, ModuleFile> = BTreeMap::new();
        let mut rendered: BTreeMap<(String, String), &Identifier> = BTreeMap::new();

        for (id, registered) in self.registry.iter() {
            let name = self.registry.rendered_name(id);
            check_type_name(&name, id)?;
            let namespace_dir = namespace_dir(id);
            if let Some(other) = rendered.insert((namespace_dir.clone(), name.clone()), id) {
                return Err(CodegenError::generation(format!(
                    "'{other}' and '{id}' are both rendered as '{name}'"
                )));
            }

            let stem = module_dir(&name);
            if stem == "mod" {
                return Err(CodegenError::generation(format!(
                    "'{id}' renders the reserved file name 'mod'"
                )));
            }

            let package_path = if self.registry.is_cyclic(id) {
                let root = root_dir(registered.package_root());
                ensure_module(&mut modules, &namespace_dir).reexports.insert(format!(
                    "{}::{}::{}::{}",
                    self.config.package_prefix(),
                    CYCLIC_MODULE,
                    rust_ident(&root),
                    rust_ident(&stem)
                ));
                format!("{CYCLIC_MODULE}/{root}")
            } else {
                namespace_dir
            };

            let source_file = registered.descriptor().source_file();
            let mut file = CodeFile::new(package_path, stem);
            file.code = self.generate_type(&types, registered.descriptor())?;

            let module = ensure_module(&mut modules, &file.package_path);
            module.files.insert(file.filename.clone());
            if !source_file.is_empty() {
                file.source_files.push(source_file.to_string());
                module.source_files.insert(source_file.to_string());
            }

            debug!(
                type_name = %id,
                path = %file.relative_path().display(),
                "generated type"
            );
            files.push(file);
        }

        for (dir, module) in &modules {
            files.push(render_module(dir, module)?);
        }

        info!(
            types = self.registry.len(),
            files = files.len(),
            "generated code"
        );
        Ok(files)
    }

    /// Generates all files and writes them under the output directory.
    ///
    /// # Returns
    /// The paths written.
    ///
    /// # Errors
    /// Returns `CodegenError` if generation fails, in which case nothing is
    /// written, or if a file cannot be written.
    pub fn write_all(&self) -> Result<Vec<PathBuf>, CodegenError> {
        let files = self.generate()?;
        let output_dir = self.config.output_dir();
        let paths = files
            .iter()
            .map(|file| file.write(output_dir, self.config.emit_header()))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            output_dir = %output_dir.display(),
            files = paths.len(),
            "wrote generated code"
        );
        Ok(paths)
    }

    /// Generates the body of one type file.
    fn generate_type(
        &self,
        types: &TypeRenderer<'_>,
        descriptor: &ComplexType,
    ) -> Result<String, CodegenError> {
        let body = match descriptor {
            ComplexType::Record(record) => RecordGenerator::new(types).generate(record)?,
            ComplexType::ComplexKey(key) => ComplexKeyGenerator::new(types).generate(key),
            ComplexType::Union(union) => UnionGenerator::new(types).generate(union)?,
            ComplexType::Typeref(typeref) => TyperefGenerator::new(types).generate_typeref(typeref),
            ComplexType::Enum(enum_def) => EnumGenerator::new(types).generate(enum_def)?,
            ComplexType::Fixed(fixed) => TyperefGenerator::new(types).generate_fixed(fixed),
        };

        let mut output = String::new();
        if body.contains(&format!("{RUNTIME_ALIAS}::")) {
            output.push_str(&format!(
                "use {} as {};\n\n",
                self.config.runtime_crate(),
                RUNTIME_ALIAS
            ));
        }
        output.push_str(&body);
        Ok(output)
    }
}

/// Returns the directory name of a namespace segment or type.
fn module_dir(name: &str) -> String {
    module_ident(name).trim_start_matches("r#").to_string()
}

fn namespace_dir(id: &Identifier) -> String {
    id.namespace_segments()
        .map(module_dir)
        .collect::<Vec<_>>()
        .join("/")
}

fn root_dir(package_root: &str) -> String {
    if package_root.is_empty() {
        "root".to_string()
    } else {
        module_dir(package_root)
    }
}

/// Returns the module of `dir`, registering it with each of its ancestors.
fn ensure_module<'m>(modules: &'m mut BTreeMap<String, ModuleFile>, dir: &str) -> &'m mut ModuleFile {
    let mut parent = String::new();
    for segment in dir.split('/').filter(|s| !s.is_empty()) {
        modules
            .entry(parent.clone())
            .or_default()
            .children
            .insert(segment.to_string());
        if !parent.is_empty() {
            parent.push('/');
        }
        parent.push_str(segment);
    }
    modules.entry(dir.to_string()).or_default()
}

fn render_module(dir: &str, module: &ModuleFile) -> Result<CodeFile, CodegenError> {
    let mut file = CodeFile::new(dir, "mod");
    file.source_files.extend(module.source_files.iter().cloned());

    let mut output = String::new();
    for child in &module.children {
        if module.files.contains(child) {
            return Err(CodegenError::generation(format!(
                "module '{child}' in '{dir}' is both a namespace and a type"
            )));
        }
        output.push_str(&format!("pub mod {};\n", rust_ident(child)));
    }
    if !module.children.is_empty() && !module.files.is_empty() {
        output.push('\n');
    }
    for stem in &module.files {
        let ident = rust_ident(stem);
        output.push_str(&format!("pub mod {};\n", ident));
        output.push_str(&format!("pub use {}::*;\n", ident));
    }
    if !module.reexports.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        for path in &module.reexports {
            output.push_str(&format!("pub use {}::*;\n", path));
        }
    }

    file.code = output;
    Ok(file)
}
