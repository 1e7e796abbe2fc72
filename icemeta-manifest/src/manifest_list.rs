//! Manifest list decoding.
//!
//! A manifest list has one row per manifest file of a snapshot.
//!
//! # Format versions
//!
//! - **V1** only guarantees `manifest_path`. Every manifest holds data files
//!   and has sequence number 0.
//! - **V2** adds `content` (data vs delete manifests) and `sequence_number`.

use icemeta_tabular::{BatchSchema, ColumnBatch};

use crate::decoder::{
    decode_enum, has_columns, int_values, long_values, required, required_str, string_values,
    BatchDecoder, WireEnum,
};
use crate::error::Result;
use crate::mapping::{manifest_list_mapping, NameMapping};
use crate::options::DecodeOptions;
use crate::version::{BatchKind, FormatVersion};

/// Columns every manifest list layout must have.
const V1_REQUIRED: &[&str] = &["manifest_path"];

/// Columns V2 requires on top of V1.
const V2_REQUIRED: &[&str] = &["content"];

/// Content type for manifest files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ManifestContent {
    /// Data files (default)
    #[default]
    Data = 0,
    /// Delete files (position or equality deletes)
    Deletes = 1,
}

impl ManifestContent {
    /// Parse from the wire code, `None` if unknown.
    pub fn try_from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Data),
            1 => Some(Self::Deletes),
            _ => None,
        }
    }

    /// The wire code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl WireEnum for ManifestContent {
    const FIELD: &'static str = "manifest content";

    fn try_from_code(code: i32) -> Option<Self> {
        ManifestContent::try_from_code(code)
    }
}

/// Entry in a manifest list (points to a manifest file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Path to the manifest file
    pub manifest_path: String,
    /// Content type: Data or Deletes
    pub content: ManifestContent,
    /// Sequence number when this manifest was added
    pub sequence_number: i64,
}

impl Manifest {
    /// Check if this is a data manifest (not deletes).
    pub fn is_data(&self) -> bool {
        self.content == ManifestContent::Data
    }

    /// Check if this is a delete manifest.
    pub fn is_deletes(&self) -> bool {
        self.content == ManifestContent::Deletes
    }
}

/// Manifest list decoder for format V1.
///
/// V1 reads no coded fields, so it takes no options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestV1;

impl BatchDecoder for ManifestV1 {
    type Entry = Manifest;
    const KIND: BatchKind = BatchKind::ManifestList;
    const VERSION: FormatVersion = FormatVersion::V1;

    fn name_mapping(&self, schema: &BatchSchema) -> Result<NameMapping> {
        Ok(manifest_list_mapping(schema))
    }

    fn verify_schema(&self, mapping: &NameMapping) -> bool {
        has_columns(mapping, V1_REQUIRED, Self::KIND, Self::VERSION)
    }

    fn produce_entries(
        &self,
        batch: &ColumnBatch,
        mapping: &NameMapping,
        out: &mut Vec<Manifest>,
    ) -> Result<()> {
        let manifest_path =
            string_values(batch, mapping.require("manifest_path")?, "manifest_path")?;

        let mut manifests = Vec::with_capacity(batch.num_rows);
        for row in batch.row_indices() {
            manifests.push(Manifest {
                manifest_path: required_str(manifest_path, row, "manifest_path")?.to_string(),
                content: ManifestContent::Data,
                sequence_number: 0,
            });
        }

        out.extend(manifests);
        Ok(())
    }
}

/// Manifest list decoder for format V2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestV2 {
    options: DecodeOptions,
}

impl ManifestV2 {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }
}

impl BatchDecoder for ManifestV2 {
    type Entry = Manifest;
    const KIND: BatchKind = BatchKind::ManifestList;
    const VERSION: FormatVersion = FormatVersion::V2;

    fn name_mapping(&self, schema: &BatchSchema) -> Result<NameMapping> {
        Ok(manifest_list_mapping(schema))
    }

    fn verify_schema(&self, mapping: &NameMapping) -> bool {
        ManifestV1.verify_schema(mapping)
            && has_columns(mapping, V2_REQUIRED, Self::KIND, Self::VERSION)
    }

    fn produce_entries(
        &self,
        batch: &ColumnBatch,
        mapping: &NameMapping,
        out: &mut Vec<Manifest>,
    ) -> Result<()> {
        let manifest_path =
            string_values(batch, mapping.require("manifest_path")?, "manifest_path")?;
        let content = int_values(batch, mapping.require("content")?, "content")?;
        // Not required by verification; absent or null means 0.
        let sequence_number = match mapping.get("sequence_number") {
            Some(locator) => Some(long_values(batch, locator, "sequence_number")?),
            None => None,
        };

        let mut manifests = Vec::with_capacity(batch.num_rows);
        for row in batch.row_indices() {
            let code = required(content, row, "content")?;
            manifests.push(Manifest {
                manifest_path: required_str(manifest_path, row, "manifest_path")?.to_string(),
                content: decode_enum(code, row, self.options.enum_decoding)?,
                sequence_number: sequence_number
                    .and_then(|values| values.get(row).copied().flatten())
                    .unwrap_or(0),
            });
        }

        out.extend(manifests);
        Ok(())
    }
}
