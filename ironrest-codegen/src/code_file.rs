//! Generated source files.

use crate::error::CodegenError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One generated Rust source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFile {
    /// Directory of the file, relative to the output directory, `/`-separated.
    pub package_path: String,
    /// File stem, without the `.rs` extension.
    pub filename: String,
    /// Schema files the contents were generated from.
    pub source_files: Vec<String>,
    /// File body, without the header.
    pub code: String,
}

impl CodeFile {
    /// Creates an empty code file.
    #[must_use]
    pub fn new(package_path: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            filename: filename.into(),
            source_files: Vec::new(),
            code: String::new(),
        }
    }

    /// Returns the path of the file relative to the output directory.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.package_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.rs", self.filename));
        path
    }

    /// Renders the complete file contents.
    #[must_use]
    pub fn render(&self, emit_header: bool) -> String {
        if !emit_header {
            return self.code.clone();
        }
        let mut output = String::with_capacity(self.code.len() + 128);
        output.push_str("// DO NOT EDIT\n");
        output.push_str("//\n");
        output.push_str("// Code automatically generated by ironrest\n");
        output.push_str("// Source files:\n");
        for source in &self.source_files {
            output.push_str(&format!("// - {}\n", source));
        }
        output.push('\n');
        output.push_str(&self.code);
        output
    }

    /// Writes the file under `output_dir`, replacing any previous version.
    ///
    /// The written file is marked read-only.
    ///
    /// # Returns
    /// The path written.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the directory cannot be created or the
    /// file cannot be replaced.
    pub fn write(&self, output_dir: &Path, emit_header: bool) -> Result<PathBuf, CodegenError> {
        let path = output_dir.join(self.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        fs::write(&path, self.render(emit_header))?;
        let mut permissions = fs::metadata(&path)?.permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions)?;

        debug!(path = %path.display(), "wrote generated file");
        Ok(path)
    }
}
