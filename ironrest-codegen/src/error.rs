//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Descriptor parsing error.
    #[error("descriptor parse error: {0}")]
    Parse(#[from] ironrest_schema::ParseError),

    /// Registry validation or analysis error.
    #[error("schema error: {0}")]
    Schema(#[from] ironrest_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry was not finalized before generation.
    #[error("type registry must be finalized before generating code")]
    NotFinalized,

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}
