//! Manifest entry decoding.
//!
//! A manifest file has one row per tracked file: an entry-level `status`
//! plus the nested `data_file` record holding the file's location, format
//! and row count. Field lookups go through the flattened [`NameMapping`], so
//! the decoders never need to know whether a name came from a top-level
//! column or from inside `data_file`.
//!
//! # Format versions
//!
//! - **V1** manifests only track data files.
//! - **V2** adds `data_file.content` (data, position deletes, equality deletes).

use icemeta_tabular::{BatchSchema, ColumnBatch};

use crate::decoder::{
    decode_enum, has_columns, int_values, long_values, required, required_str, string_values,
    BatchDecoder, WireEnum,
};
use crate::error::Result;
use crate::mapping::{manifest_entry_mapping, ColumnLocator, NameMapping};
use crate::options::{DecodeOptions, EnumDecoding};
use crate::version::{BatchKind, FormatVersion};

/// Columns every manifest entry layout must have.
const V1_REQUIRED: &[&str] = &["status", "file_path", "file_format", "record_count"];

/// Columns V2 requires on top of V1.
const V2_REQUIRED: &[&str] = &["content"];

/// Status of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ManifestEntryStatus {
    /// Existing file (status = 0)
    #[default]
    Existing = 0,
    /// Added file (status = 1)
    Added = 1,
    /// Deleted file (status = 2)
    Deleted = 2,
}

impl ManifestEntryStatus {
    /// Parse from the wire code, `None` if unknown.
    pub fn try_from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Existing),
            1 => Some(Self::Added),
            2 => Some(Self::Deleted),
            _ => None,
        }
    }

    /// The wire code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Check if this is an active (non-deleted) entry.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Deleted)
    }
}

impl WireEnum for ManifestEntryStatus {
    const FIELD: &'static str = "status";

    fn try_from_code(code: i32) -> Option<Self> {
        ManifestEntryStatus::try_from_code(code)
    }
}

/// Content type of a tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataContent {
    /// Data rows
    #[default]
    Data = 0,
    /// Position-based delete markers
    PositionDeletes = 1,
    /// Equality-based delete markers
    EqualityDeletes = 2,
}

impl DataContent {
    /// Parse from the wire code, `None` if unknown.
    pub fn try_from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Data),
            1 => Some(Self::PositionDeletes),
            2 => Some(Self::EqualityDeletes),
            _ => None,
        }
    }

    /// The wire code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl WireEnum for DataContent {
    const FIELD: &'static str = "data file content";

    fn try_from_code(code: i32) -> Option<Self> {
        DataContent::try_from_code(code)
    }
}

/// File format for tracked files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Parquet,
    Orc,
    Avro,
}

impl FileFormat {
    /// Parse from string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PARQUET" => Some(Self::Parquet),
            "ORC" => Some(Self::Orc),
            "AVRO" => Some(Self::Avro),
            _ => None,
        }
    }
}

/// A manifest entry: one tracked file and its status in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Entry status (existing, added, deleted)
    pub status: ManifestEntryStatus,
    /// Content type of the file
    pub content: DataContent,
    /// Path to the file
    pub file_path: String,
    /// File format as written in the manifest
    pub file_format: String,
    /// Number of records in the file
    pub record_count: i64,
}

impl ManifestEntry {
    /// Check if this entry is active (not deleted).
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Check if this entry tracks a data file (not deletes).
    pub fn is_data(&self) -> bool {
        self.content == DataContent::Data
    }

    /// Parsed file format, `None` for formats this crate does not know.
    pub fn format(&self) -> Option<FileFormat> {
        FileFormat::parse(&self.file_format)
    }
}

/// Two locators that both point into a struct must point into the same one.
fn same_struct(a: &ColumnLocator, b: &ColumnLocator) -> bool {
    !(a.has_children() && b.has_children()) || a.primary_index() == b.primary_index()
}

/// Column views shared by both entry versions.
struct EntryColumns<'a> {
    status: &'a [Option<i32>],
    file_path: &'a [Option<String>],
    file_format: &'a [Option<String>],
    record_count: &'a [Option<i64>],
}

impl<'a> EntryColumns<'a> {
    fn resolve(batch: &'a ColumnBatch, mapping: &NameMapping) -> Result<Self> {
        let file_path = mapping.require("file_path")?;
        let file_format = mapping.require("file_format")?;
        let record_count = mapping.require("record_count")?;
        debug_assert!(
            same_struct(file_path, file_format) && same_struct(file_path, record_count),
            "data_file fields resolve to different struct columns"
        );

        Ok(Self {
            status: int_values(batch, mapping.require("status")?, "status")?,
            file_path: string_values(batch, file_path, "file_path")?,
            file_format: string_values(batch, file_format, "file_format")?,
            record_count: long_values(batch, record_count, "record_count")?,
        })
    }

    fn entry(&self, row: usize, content: DataContent, mode: EnumDecoding) -> Result<ManifestEntry> {
        let status = required(self.status, row, "status")?;
        Ok(ManifestEntry {
            status: decode_enum(status, row, mode)?,
            content,
            file_path: required_str(self.file_path, row, "file_path")?.to_string(),
            file_format: required_str(self.file_format, row, "file_format")?.to_string(),
            record_count: required(self.record_count, row, "record_count")?,
        })
    }
}

/// Manifest entry decoder for format V1.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestEntryV1 {
    options: DecodeOptions,
}

impl ManifestEntryV1 {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }
}

impl BatchDecoder for ManifestEntryV1 {
    type Entry = ManifestEntry;
    const KIND: BatchKind = BatchKind::ManifestEntry;
    const VERSION: FormatVersion = FormatVersion::V1;

    fn name_mapping(&self, schema: &BatchSchema) -> Result<NameMapping> {
        manifest_entry_mapping(schema)
    }

    fn verify_schema(&self, mapping: &NameMapping) -> bool {
        has_columns(mapping, V1_REQUIRED, Self::KIND, Self::VERSION)
    }

    fn produce_entries(
        &self,
        batch: &ColumnBatch,
        mapping: &NameMapping,
        out: &mut Vec<ManifestEntry>,
    ) -> Result<()> {
        let columns = EntryColumns::resolve(batch, mapping)?;

        let mut entries = Vec::with_capacity(batch.num_rows);
        for row in batch.row_indices() {
            entries.push(columns.entry(row, DataContent::Data, self.options.enum_decoding)?);
        }

        out.extend(entries);
        Ok(())
    }
}

/// Manifest entry decoder for format V2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestEntryV2 {
    options: DecodeOptions,
}

impl ManifestEntryV2 {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }
}

impl BatchDecoder for ManifestEntryV2 {
    type Entry = ManifestEntry;
    const KIND: BatchKind = BatchKind::ManifestEntry;
    const VERSION: FormatVersion = FormatVersion::V2;

    fn name_mapping(&self, schema: &BatchSchema) -> Result<NameMapping> {
        manifest_entry_mapping(schema)
    }

    fn verify_schema(&self, mapping: &NameMapping) -> bool {
        ManifestEntryV1::new(self.options).verify_schema(mapping)
            && has_columns(mapping, V2_REQUIRED, Self::KIND, Self::VERSION)
    }

    fn produce_entries(
        &self,
        batch: &ColumnBatch,
        mapping: &NameMapping,
        out: &mut Vec<ManifestEntry>,
    ) -> Result<()> {
        let columns = EntryColumns::resolve(batch, mapping)?;
        let content_locator = mapping.require("content")?;
        debug_assert!(
            same_struct(mapping.require("file_path")?, content_locator),
            "data_file.content resolves to a different struct column"
        );
        let content = int_values(batch, content_locator, "content")?;

        let mode = self.options.enum_decoding;
        let mut entries = Vec::with_capacity(batch.num_rows);
        for row in batch.row_indices() {
            let code = required(content, row, "content")?;
            entries.push(columns.entry(row, decode_enum(code, row, mode)?, mode)?);
        }

        out.extend(entries);
        Ok(())
    }
}
