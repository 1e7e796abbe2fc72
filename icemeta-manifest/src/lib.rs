//! Version-aware decoding of Iceberg manifest metadata from columnar batches.
//!
//! A reader (Avro, Parquet, ...) hands this crate a [`ColumnBatch`] holding
//! manifest list rows or manifest entry rows. Decoding a batch is a three
//! step pipeline shared by every decoder:
//!
//! 1. **Column discovery** - a case-insensitive [`NameMapping`] from field
//!    name to [`ColumnLocator`], flattening the nested `data_file` struct of
//!    manifest entries
//! 2. **Schema verification** - a boolean check that the batch has the
//!    columns a format version requires
//! 3. **Typed extraction** - one [`Manifest`] or [`ManifestEntry`] per row
//!
//! # Architecture
//!
//! - [`mapping`] - column locators and name mapping builders
//! - [`decoder`] - the [`BatchDecoder`] contract shared by all versions
//! - [`manifest_list`] - [`ManifestV1`] / [`ManifestV2`]
//! - [`manifest_entry`] - [`ManifestEntryV1`] / [`ManifestEntryV2`]
//! - [`reader`] - decoder selection from the table's declared format version
//! - [`options`] - [`DecodeOptions`] (strict or lenient code decoding, V1 fallback)
//!
//! # Example
//!
//! ```ignore
//! use icemeta_manifest::{decode_manifest_entry_batch, DecodeOptions, FormatVersion};
//!
//! let version = FormatVersion::from_metadata(metadata.format_version)?;
//! let mut entries = Vec::new();
//! for batch in batches {
//!     decode_manifest_entry_batch(version, &DecodeOptions::default(), &batch, &mut entries)?;
//! }
//! let live: Vec<_> = entries.iter().filter(|e| e.is_active()).collect();
//! ```
//!
//! [`ColumnBatch`]: icemeta_tabular::ColumnBatch

pub mod decoder;
pub mod error;
pub mod manifest_entry;
pub mod manifest_list;
pub mod mapping;
pub mod options;
pub mod reader;
pub mod version;

pub use decoder::BatchDecoder;
pub use error::{ManifestError, Result};
pub use manifest_entry::{
    DataContent, FileFormat, ManifestEntry, ManifestEntryStatus, ManifestEntryV1, ManifestEntryV2,
};
pub use manifest_list::{Manifest, ManifestContent, ManifestV1, ManifestV2};
pub use mapping::{manifest_entry_mapping, manifest_list_mapping, ColumnLocator, NameMapping};
pub use options::{DecodeOptions, EnumDecoding};
pub use reader::{decode_manifest_entry_batch, decode_manifest_list_batch};
pub use version::{BatchKind, FormatVersion};
