//! Iceberg format versions and the two batch families.

use std::fmt;

use crate::error::{ManifestError, Result};

/// Iceberg table format version.
///
/// V2 adds the `content` and `sequence_number` fields that V1 lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatVersion {
    V1 = 1,
    V2 = 2,
}

impl FormatVersion {
    /// Parse the `format-version` value from table metadata.
    pub fn from_metadata(format_version: i32) -> Result<Self> {
        match format_version {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(ManifestError::UnsupportedVersion(other)),
        }
    }

    /// The integer stored in table metadata.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_i32())
    }
}

/// Which kind of rows a batch holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Rows of a manifest list (one per manifest file)
    ManifestList,
    /// Rows of a manifest file (one per data/delete file)
    ManifestEntry,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestList => f.write_str("manifest list"),
            Self::ManifestEntry => f.write_str("manifest entry"),
        }
    }
}
