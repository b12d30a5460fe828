//! Error types for IronRest codec operations.

use thiserror::Error;

/// Core error type for marshalling, unmarshalling and patch validation.
#[derive(Debug, Error)]
pub enum CodecError {
    /// One or more required fields were absent after reading a record.
    #[error("record '{record}' is missing required fields: {}", fields.join(", "))]
    MissingRequiredFields {
        /// Full name of the record type.
        record: String,
        /// Names of the missing fields, in declaration order.
        fields: Vec<String>,
    },

    /// A patch both deletes and sets the same field.
    #[error("field '{field}' of '{record}' cannot be both deleted and set in the same patch")]
    PatchConflict {
        /// Full name of the record type.
        record: String,
        /// Name of the offending field.
        field: String,
    },

    /// The value has a different shape than the one being read.
    #[error("expected {expected}, found {actual}")]
    UnexpectedType {
        /// Expected value kind.
        expected: &'static str,
        /// Actual value kind.
        actual: &'static str,
    },

    /// The value has the right shape but cannot be converted.
    #[error("invalid value: {message}")]
    InvalidValue {
        /// Error message.
        message: String,
    },

    /// An error while reading a specific field.
    #[error("field '{field}': {source}")]
    Field {
        /// Field name.
        field: String,
        /// Underlying error.
        #[source]
        source: Box<CodecError>,
    },

    /// Malformed JSON text.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed ROR2 text.
    #[error("ROR2 syntax error at byte {position}: {message}")]
    Ror2Syntax {
        /// Byte offset of the error.
        position: usize,
        /// Error message.
        message: String,
    },
}

impl CodecError {
    /// Creates an invalid value error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Creates a patch conflict error.
    pub fn patch_conflict(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::PatchConflict {
            record: record.into(),
            field: field.into(),
        }
    }

    /// Wraps this error with the name of the field being read.
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field context.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for IronRest codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
