//! Generator configuration.

use std::path::{Path, PathBuf};

/// Default directory generated files are written under.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";
/// Default module path of the generated tree inside the consuming crate.
pub const DEFAULT_PACKAGE_PREFIX: &str = "crate::generated";
/// Default name of the runtime crate generated code imports.
pub const DEFAULT_RUNTIME_CRATE: &str = "ironrest_core";

/// Configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    output_dir: PathBuf,
    package_prefix: String,
    runtime_crate: String,
    emit_header: bool,
}

impl GeneratorConfig {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the module path the generated tree is mounted at.
    #[must_use]
    pub fn package_prefix(&self) -> &str {
        &self.package_prefix
    }

    /// Returns the runtime crate name.
    #[must_use]
    pub fn runtime_crate(&self) -> &str {
        &self.runtime_crate
    }

    /// Returns true if files start with the "do not edit" header.
    #[must_use]
    pub const fn emit_header(&self) -> bool {
        self.emit_header
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    output_dir: PathBuf,
    package_prefix: String,
    runtime_crate: String,
    emit_header: bool,
}

impl GeneratorConfigBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            emit_header: true,
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the module path the generated tree is mounted at.
    #[must_use]
    pub fn package_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.package_prefix = prefix.into();
        self
    }

    /// Sets the runtime crate name.
    #[must_use]
    pub fn runtime_crate(mut self, name: impl Into<String>) -> Self {
        self.runtime_crate = name.into();
        self
    }

    /// Enables or disables the file header.
    #[must_use]
    pub fn emit_header(mut self, enabled: bool) -> Self {
        self.emit_header = enabled;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> GeneratorConfig {
        GeneratorConfig {
            output_dir: self.output_dir,
            package_prefix: self.package_prefix,
            runtime_crate: self.runtime_crate,
            emit_header: self.emit_header,
        }
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
