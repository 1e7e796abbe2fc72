//! Error types for manifest decoding.

use thiserror::Error;

use crate::version::{BatchKind, FormatVersion};

/// Errors from manifest decoding.
///
/// A batch that merely lacks a version's required columns is not an error:
/// verifiers report that as `false`. Only the helpers in [`crate::reader`]
/// turn "no candidate version matched" into [`ManifestError::SchemaMismatch`].
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Batch layout cannot be decoded at all (e.g. `data_file` is not a struct)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Value-level failure during extraction (wrong column type, null, bad code)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Table metadata declares a format version this crate does not know
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(i32),

    /// No candidate format version verified against the batch columns
    #[error("Batch columns do not match the {kind} {version} layout")]
    SchemaMismatch {
        version: FormatVersion,
        kind: BatchKind,
    },

    /// Invalid decode options
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ManifestError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for manifest decoding.
pub type Result<T> = std::result::Result<T, ManifestError>;
