//! Version selection for callers that know the table's format version.
//!
//! The decoders themselves never guess a version. These helpers pick the
//! decoder from the `format-version` declared in table metadata and, for V2
//! tables, optionally retry a batch with the V1 layout (older manifests can
//! survive in a table upgraded to V2).

use icemeta_tabular::ColumnBatch;

use crate::decoder::BatchDecoder;
use crate::error::{ManifestError, Result};
use crate::manifest_entry::{ManifestEntry, ManifestEntryV1, ManifestEntryV2};
use crate::manifest_list::{Manifest, ManifestV1, ManifestV2};
use crate::options::DecodeOptions;
use crate::version::FormatVersion;

/// Decode a manifest list batch, returning the version that matched.
pub fn decode_manifest_list_batch(
    version: FormatVersion,
    options: &DecodeOptions,
    batch: &ColumnBatch,
    out: &mut Vec<Manifest>,
) -> Result<FormatVersion> {
    decode_with_fallback(
        version,
        options,
        &ManifestV1,
        &ManifestV2::new(*options),
        batch,
        out,
    )
}

/// Decode a manifest entry batch, returning the version that matched.
pub fn decode_manifest_entry_batch(
    version: FormatVersion,
    options: &DecodeOptions,
    batch: &ColumnBatch,
    out: &mut Vec<ManifestEntry>,
) -> Result<FormatVersion> {
    decode_with_fallback(
        version,
        options,
        &ManifestEntryV1::new(*options),
        &ManifestEntryV2::new(*options),
        batch,
        out,
    )
}

fn decode_with_fallback<V1, V2>(
    version: FormatVersion,
    options: &DecodeOptions,
    v1: &V1,
    v2: &V2,
    batch: &ColumnBatch,
    out: &mut Vec<V1::Entry>,
) -> Result<FormatVersion>
where
    V1: BatchDecoder,
    V2: BatchDecoder<Entry = V1::Entry>,
{
    // Both versions of a family share one mapping builder.
    let mapping = v1.name_mapping(&batch.schema)?;

    let matched = match version {
        FormatVersion::V2 if v2.verify_schema(&mapping) => FormatVersion::V2,
        FormatVersion::V2 if options.fallback_to_v1 && v1.verify_schema(&mapping) => {
            tracing::debug!(
                kind = %V1::KIND,
                rows = batch.num_rows,
                "Batch does not verify as v2, decoding as v1"
            );
            FormatVersion::V1
        }
        FormatVersion::V1 if v1.verify_schema(&mapping) => FormatVersion::V1,
        _ => {
            return Err(ManifestError::SchemaMismatch {
                version,
                kind: V1::KIND,
            })
        }
    };

    match matched {
        FormatVersion::V2 => v2.produce_entries(batch, &mapping, out)?,
        FormatVersion::V1 => v1.produce_entries(batch, &mapping, out)?,
    }

    tracing::trace!(
        kind = %V1::KIND,
        declared = %version,
        matched = %matched,
        rows = batch.num_rows,
        "Decoded batch"
    );
    Ok(matched)
}
