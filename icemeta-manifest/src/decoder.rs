//! Shared decoding contract for the versioned manifest decoders.
//!
//! Every decoder runs the same pipeline over a batch:
//!
//! 1. [`BatchDecoder::name_mapping`] - discover columns from the schema only
//! 2. [`BatchDecoder::verify_schema`] - check the version's required columns
//! 3. [`BatchDecoder::produce_entries`] - read typed values row by row
//!
//! Verification is a plain predicate. A `false` result is how callers tell
//! V1 and V2 layouts apart, so it never surfaces as an error here.

use icemeta_tabular::{BatchSchema, Column, ColumnBatch};

use crate::error::{ManifestError, Result};
use crate::mapping::{ColumnLocator, NameMapping};
use crate::options::EnumDecoding;
use crate::version::{BatchKind, FormatVersion};

/// Versioned decoder for one batch family.
pub trait BatchDecoder {
    /// Record type produced per row.
    type Entry;

    /// Batch family this decoder reads.
    const KIND: BatchKind;

    /// Format version this decoder implements.
    const VERSION: FormatVersion;

    /// Build the name mapping for a batch schema. Reads no column data.
    fn name_mapping(&self, schema: &BatchSchema) -> Result<NameMapping>;

    /// Check that the mapping has every column this version requires.
    fn verify_schema(&self, mapping: &NameMapping) -> bool;

    /// Append one record per batch row, in row order.
    ///
    /// The mapping must have passed [`BatchDecoder::verify_schema`]. On error
    /// nothing is appended to `out`.
    fn produce_entries(
        &self,
        batch: &ColumnBatch,
        mapping: &NameMapping,
        out: &mut Vec<Self::Entry>,
    ) -> Result<()>;

    /// Run the whole pipeline over one batch.
    ///
    /// Returns `Ok(false)` without touching `out` when the batch does not
    /// verify against this version.
    fn decode_batch(&self, batch: &ColumnBatch, out: &mut Vec<Self::Entry>) -> Result<bool> {
        let mapping = self.name_mapping(&batch.schema)?;
        if !self.verify_schema(&mapping) {
            return Ok(false);
        }
        self.produce_entries(batch, &mapping, out)?;
        tracing::trace!(
            kind = %Self::KIND,
            version = %Self::VERSION,
            rows = batch.num_rows,
            "Decoded batch"
        );
        Ok(true)
    }
}

/// Check that every name in `required` is mapped.
///
/// Logs the first missing column at debug level.
pub(crate) fn has_columns(
    mapping: &NameMapping,
    required: &[&str],
    kind: BatchKind,
    version: FormatVersion,
) -> bool {
    match required.iter().find(|name| !mapping.contains(name)) {
        Some(missing) => {
            tracing::debug!(
                column = %missing,
                kind = %kind,
                version = %version,
                "Batch does not verify: required column missing"
            );
            false
        }
        None => true,
    }
}

/// Closed enumeration stored as a 32-bit integer code.
pub(crate) trait WireEnum: Copy + Default + std::fmt::Debug {
    /// Field name used in error messages.
    const FIELD: &'static str;

    fn try_from_code(code: i32) -> Option<Self>;
}

/// Convert a raw code, honouring the configured strictness.
pub(crate) fn decode_enum<T: WireEnum>(code: i32, row: usize, mode: EnumDecoding) -> Result<T> {
    if let Some(value) = T::try_from_code(code) {
        return Ok(value);
    }
    match mode {
        EnumDecoding::Strict => Err(ManifestError::decode(format!(
            "Invalid {} code {} at row {}",
            T::FIELD,
            code,
            row
        ))),
        EnumDecoding::Lenient => {
            let fallback = T::default();
            tracing::warn!(
                field = T::FIELD,
                code,
                row,
                fallback = ?fallback,
                "Unknown code, using default"
            );
            Ok(fallback)
        }
    }
}

fn type_error(name: &str, expected: &str, column: &Column) -> ManifestError {
    ManifestError::decode(format!(
        "Column '{}' must be {}, found {}",
        name,
        expected,
        column.type_name()
    ))
}

/// String values of a mapped column.
pub(crate) fn string_values<'a>(
    batch: &'a ColumnBatch,
    locator: &ColumnLocator,
    name: &str,
) -> Result<&'a [Option<String>]> {
    match locator.resolve(batch)? {
        Column::String(values) => Ok(values),
        other => Err(type_error(name, "string", other)),
    }
}

/// 32-bit integer values of a mapped column.
pub(crate) fn int_values<'a>(
    batch: &'a ColumnBatch,
    locator: &ColumnLocator,
    name: &str,
) -> Result<&'a [Option<i32>]> {
    match locator.resolve(batch)? {
        Column::Int32(values) => Ok(values),
        other => Err(type_error(name, "int", other)),
    }
}

/// 64-bit integer values of a mapped column.
pub(crate) fn long_values<'a>(
    batch: &'a ColumnBatch,
    locator: &ColumnLocator,
    name: &str,
) -> Result<&'a [Option<i64>]> {
    match locator.resolve(batch)? {
        Column::Int64(values) => Ok(values),
        other => Err(type_error(name, "long", other)),
    }
}

/// Non-null value at `row`.
pub(crate) fn required<T: Clone>(values: &[Option<T>], row: usize, name: &str) -> Result<T> {
    values
        .get(row)
        .and_then(|v| v.clone())
        .ok_or_else(|| ManifestError::decode(format!("Null {} at row {}", name, row)))
}

/// Non-null string at `row`, borrowed.
pub(crate) fn required_str<'a>(
    values: &'a [Option<String>],
    row: usize,
    name: &str,
) -> Result<&'a str> {
    values
        .get(row)
        .and_then(|v| v.as_deref())
        .ok_or_else(|| ManifestError::decode(format!("Null {} at row {}", name, row)))
}
