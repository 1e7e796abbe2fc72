//! Integration tests for versioned manifest decoding.
//!
//! Batches here are shaped like the output of an Avro reader over real
//! manifest lists and manifest files: snake_case names, a nested
//! `data_file` record, and extra columns the decoders do not use.

use std::sync::Arc;

use icemeta_manifest::{
    decode_manifest_entry_batch, decode_manifest_list_batch, BatchDecoder, ColumnLocator,
    DataContent, DecodeOptions, FormatVersion, Manifest, ManifestContent, ManifestEntry,
    ManifestEntryStatus, ManifestEntryV1, ManifestEntryV2, ManifestError, ManifestV1, ManifestV2,
};
use icemeta_tabular::{BatchSchema, Column, ColumnBatch, FieldInfo, FieldType};
use pretty_assertions::assert_eq;

fn strings(values: &[&str]) -> Column {
    Column::String(values.iter().map(|s| Some(s.to_string())).collect())
}

/// Manifest list batch with all V2 columns plus unrelated ones.
fn manifest_list_v2() -> ColumnBatch {
    let schema = Arc::new(BatchSchema::new(vec![
        FieldInfo::required("manifest_path", FieldType::String),
        FieldInfo::required("manifest_length", FieldType::Int64),
        FieldInfo::required("partition_spec_id", FieldType::Int32),
        FieldInfo::required("content", FieldType::Int32),
        FieldInfo::required("sequence_number", FieldType::Int64),
        FieldInfo::required("added_snapshot_id", FieldType::Int64),
    ]));
    ColumnBatch::new(
        schema,
        vec![
            strings(&[
                "s3://bucket/t/metadata/m0.avro",
                "s3://bucket/t/metadata/m1-deletes.avro",
                "s3://bucket/t/metadata/m2.avro",
            ]),
            Column::Int64(vec![Some(1234), Some(500), Some(777)]),
            Column::Int32(vec![Some(0), Some(0), Some(0)]),
            Column::Int32(vec![Some(0), Some(1), Some(0)]),
            Column::Int64(vec![Some(3), Some(4), Some(5)]),
            Column::Int64(vec![Some(100), Some(101), Some(102)]),
        ],
    )
    .unwrap()
}

/// Manifest list batch as written by a V1 table (no content/sequence).
fn manifest_list_v1() -> ColumnBatch {
    let schema = Arc::new(BatchSchema::new(vec![
        FieldInfo::required("MANIFEST_PATH", FieldType::String),
        FieldInfo::required("manifest_length", FieldType::Int64),
    ]));
    ColumnBatch::new(
        schema,
        vec![
            strings(&["m0.avro", "m1.avro"]),
            Column::Int64(vec![Some(1), Some(2)]),
        ],
    )
    .unwrap()
}

/// Manifest entry batch with a nested `data_file`, optionally with content.
fn manifest_entries(
    statuses: &[i32],
    paths: &[&str],
    counts: &[i64],
    contents: Option<&[i32]>,
) -> ColumnBatch {
    let rows = statuses.len();

    let mut child_fields = Vec::new();
    let mut children = Vec::new();
    if let Some(contents) = contents {
        child_fields.push(FieldInfo::required("content", FieldType::Int32));
        children.push(Column::Int32(contents.iter().map(|c| Some(*c)).collect()));
    }
    child_fields.push(FieldInfo::required("file_path", FieldType::String));
    children.push(strings(paths));
    child_fields.push(FieldInfo::required("file_format", FieldType::String));
    children.push(Column::String(vec![Some("PARQUET".to_string()); rows]));
    child_fields.push(FieldInfo::required("record_count", FieldType::Int64));
    children.push(Column::Int64(counts.iter().map(|c| Some(*c)).collect()));
    child_fields.push(FieldInfo::required("file_size_in_bytes", FieldType::Int64));
    children.push(Column::Int64(vec![Some(4096); rows]));

    let schema = Arc::new(BatchSchema::new(vec![
        FieldInfo::required("status", FieldType::Int32),
        FieldInfo::new("snapshot_id", FieldType::Int64),
        FieldInfo::required("data_file", FieldType::Struct(child_fields)),
    ]));
    ColumnBatch::new(
        schema,
        vec![
            Column::Int32(statuses.iter().map(|s| Some(*s)).collect()),
            Column::Int64(vec![Some(42); rows]),
            Column::new_struct(children).unwrap(),
        ],
    )
    .unwrap()
}

#[test]
fn test_superset_batch_verifies_as_both_versions() {
    let batch = manifest_list_v2();
    let mapping = ManifestV2::default().name_mapping(&batch.schema).unwrap();

    assert!(ManifestV2::default().verify_schema(&mapping));
    assert!(ManifestV1.verify_schema(&mapping));
}

#[test]
fn test_missing_content_fails_v2_only() {
    let batch = manifest_list_v1();
    let mapping = ManifestV1.name_mapping(&batch.schema).unwrap();

    assert!(!ManifestV2::default().verify_schema(&mapping));
    assert!(ManifestV1.verify_schema(&mapping));

    // Without manifest_path neither version verifies.
    let schema = BatchSchema::new(vec![FieldInfo::required("manifest_length", FieldType::Int64)]);
    let mapping = ManifestV1.name_mapping(&schema).unwrap();
    assert!(!ManifestV1.verify_schema(&mapping));
    assert!(!ManifestV2::default().verify_schema(&mapping));
}

#[test]
fn test_manifest_v2_extraction_preserves_rows() {
    let batch = manifest_list_v2();
    let mut out = Vec::new();
    assert!(ManifestV2::default().decode_batch(&batch, &mut out).unwrap());

    assert_eq!(
        out,
        vec![
            Manifest {
                manifest_path: "s3://bucket/t/metadata/m0.avro".to_string(),
                content: ManifestContent::Data,
                sequence_number: 3,
            },
            Manifest {
                manifest_path: "s3://bucket/t/metadata/m1-deletes.avro".to_string(),
                content: ManifestContent::Deletes,
                sequence_number: 4,
            },
            Manifest {
                manifest_path: "s3://bucket/t/metadata/m2.avro".to_string(),
                content: ManifestContent::Data,
                sequence_number: 5,
            },
        ]
    );
}

#[test]
fn test_manifest_v1_extraction_uses_defaults() {
    // Even with content/sequence_number columns present, V1 ignores them.
    let batch = manifest_list_v2();
    let mut out = Vec::new();
    assert!(ManifestV1.decode_batch(&batch, &mut out).unwrap());

    assert_eq!(out.len(), batch.num_rows);
    for manifest in &out {
        assert_eq!(manifest.content, ManifestContent::Data);
        assert_eq!(manifest.sequence_number, 0);
    }
    assert_eq!(out[1].manifest_path, "s3://bucket/t/metadata/m1-deletes.avro");
}

#[test]
fn test_extraction_appends_to_existing_output() {
    let mut out = Vec::new();
    assert!(ManifestV1.decode_batch(&manifest_list_v1(), &mut out).unwrap());
    assert!(ManifestV1.decode_batch(&manifest_list_v1(), &mut out).unwrap());

    let paths: Vec<_> = out.iter().map(|m| m.manifest_path.as_str()).collect();
    assert_eq!(paths, vec!["m0.avro", "m1.avro", "m0.avro", "m1.avro"]);
}

#[test]
fn test_unverified_batch_leaves_output_untouched() {
    let mut out = Vec::new();
    assert!(!ManifestV2::default()
        .decode_batch(&manifest_list_v1(), &mut out)
        .unwrap());
    assert!(out.is_empty());
}

#[test]
fn test_mixed_case_child_maps_to_nested_locator() {
    let schema = BatchSchema::new(vec![
        FieldInfo::required("status", FieldType::Int32),
        FieldInfo::required(
            "data_file",
            FieldType::Struct(vec![
                FieldInfo::required("File_Path", FieldType::String),
                FieldInfo::required("file_format", FieldType::String),
            ]),
        ),
    ]);
    let mapping = ManifestEntryV1::default().name_mapping(&schema).unwrap();

    assert_eq!(mapping.get("file_path"), Some(&ColumnLocator::nested(1, 0)));
    assert_eq!(mapping.get("file_path").unwrap().primary_index(), 1);
    assert_eq!(mapping.get("file_path").unwrap().child_index(0), Some(0));
}

#[test]
fn test_non_struct_data_file_is_schema_error() {
    let schema = Arc::new(BatchSchema::new(vec![
        FieldInfo::required("status", FieldType::Int32),
        FieldInfo::required("data_file", FieldType::String),
    ]));
    let batch = ColumnBatch::new(
        schema,
        vec![Column::Int32(vec![Some(1)]), strings(&["oops"])],
    )
    .unwrap();

    let mut out = Vec::new();
    for result in [
        ManifestEntryV1::default().decode_batch(&batch, &mut out),
        ManifestEntryV2::default().decode_batch(&batch, &mut out),
    ] {
        assert!(matches!(result, Err(ManifestError::Schema(_))));
    }
    assert!(out.is_empty());

    let err = decode_manifest_entry_batch(
        FormatVersion::V2,
        &DecodeOptions::default(),
        &batch,
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, ManifestError::Schema(_)));
}

#[test]
fn test_entry_example_without_content() {
    let batch = manifest_entries(
        &[1, 2],
        &["a.parquet", "b.parquet"],
        &[10, 20],
        None,
    );
    let mapping = ManifestEntryV1::default().name_mapping(&batch.schema).unwrap();
    assert!(ManifestEntryV1::default().verify_schema(&mapping));
    assert!(!ManifestEntryV2::default().verify_schema(&mapping));

    let mut out = Vec::new();
    ManifestEntryV1::default()
        .produce_entries(&batch, &mapping, &mut out)
        .unwrap();

    assert_eq!(
        out,
        vec![
            ManifestEntry {
                status: ManifestEntryStatus::Added,
                content: DataContent::Data,
                file_path: "a.parquet".to_string(),
                file_format: "PARQUET".to_string(),
                record_count: 10,
            },
            ManifestEntry {
                status: ManifestEntryStatus::Deleted,
                content: DataContent::Data,
                file_path: "b.parquet".to_string(),
                file_format: "PARQUET".to_string(),
                record_count: 20,
            },
        ]
    );
}

#[test]
fn test_entry_v2_reads_content() {
    let batch = manifest_entries(
        &[1, 0, 1],
        &["d.parquet", "pos.parquet", "eq.parquet"],
        &[5, 6, 7],
        Some(&[0, 1, 2][..]),
    );
    let mut out = Vec::new();
    assert!(ManifestEntryV2::default().decode_batch(&batch, &mut out).unwrap());

    let contents: Vec<_> = out.iter().map(|e| e.content).collect();
    assert_eq!(
        contents,
        vec![
            DataContent::Data,
            DataContent::PositionDeletes,
            DataContent::EqualityDeletes,
        ]
    );
    let counts: Vec<_> = out.iter().map(|e| e.record_count).collect();
    assert_eq!(counts, vec![5, 6, 7]);
}

#[test]
fn test_entry_verifier_accepts_flat_columns() {
    // The verifier only looks at flattened names, not where they came from.
    let schema = Arc::new(BatchSchema::new(vec![
        FieldInfo::required("status", FieldType::Int32),
        FieldInfo::required("file_path", FieldType::String),
        FieldInfo::required("file_format", FieldType::String),
        FieldInfo::required("record_count", FieldType::Int64),
    ]));
    let batch = ColumnBatch::new(
        schema,
        vec![
            Column::Int32(vec![Some(1), Some(2)]),
            strings(&["a.parquet", "b.parquet"]),
            strings(&["PARQUET", "PARQUET"]),
            Column::Int64(vec![Some(10), Some(20)]),
        ],
    )
    .unwrap();

    let mut out = Vec::new();
    assert!(ManifestEntryV1::default().decode_batch(&batch, &mut out).unwrap());
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].status, ManifestEntryStatus::Deleted);
    assert_eq!(out[1].record_count, 20);
}

#[test]
fn test_entry_wrong_record_count_type() {
    let schema = Arc::new(BatchSchema::new(vec![
        FieldInfo::required("status", FieldType::Int32),
        FieldInfo::required(
            "data_file",
            FieldType::Struct(vec![
                FieldInfo::required("file_path", FieldType::String),
                FieldInfo::required("file_format", FieldType::String),
                FieldInfo::required("record_count", FieldType::Int32),
            ]),
        ),
    ]));
    let batch = ColumnBatch::new(
        schema,
        vec![
            Column::Int32(vec![Some(1)]),
            Column::new_struct(vec![
                strings(&["a.parquet"]),
                strings(&["PARQUET"]),
                Column::Int32(vec![Some(10)]),
            ])
            .unwrap(),
        ],
    )
    .unwrap();

    let mut out = Vec::new();
    let err = ManifestEntryV1::default()
        .decode_batch(&batch, &mut out)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Decode error: Column 'record_count' must be long, found int"
    );
    assert!(out.is_empty());
}

#[test]
fn test_empty_batch_yields_no_records() {
    let batch = ColumnBatch::empty(Arc::clone(&manifest_list_v2().schema));
    let mut out = Vec::new();
    assert!(ManifestV2::default().decode_batch(&batch, &mut out).unwrap());
    assert!(out.is_empty());
}

#[test]
fn test_version_selection_from_metadata() {
    let options = DecodeOptions::default();

    let version = FormatVersion::from_metadata(2).unwrap();
    let mut manifests = Vec::new();
    let used =
        decode_manifest_list_batch(version, &options, &manifest_list_v2(), &mut manifests).unwrap();
    assert_eq!(used, FormatVersion::V2);
    assert!(manifests[1].is_deletes());

    // A V1-shaped batch in a V2 table falls back to V1 defaults.
    let used =
        decode_manifest_list_batch(version, &options, &manifest_list_v1(), &mut manifests).unwrap();
    assert_eq!(used, FormatVersion::V1);
    assert_eq!(manifests.len(), 5);
    assert_eq!(manifests[4].sequence_number, 0);

    // A V1 table never reads V2 columns.
    let mut entries = Vec::new();
    let batch = manifest_entries(&[1], &["a.parquet"], &[1], Some(&[2][..]));
    let used =
        decode_manifest_entry_batch(FormatVersion::V1, &options, &batch, &mut entries).unwrap();
    assert_eq!(used, FormatVersion::V1);
    assert_eq!(entries[0].content, DataContent::Data);
}

#[test]
fn test_v1_table_rejects_batch_without_required_columns() {
    let schema = Arc::new(BatchSchema::new(vec![FieldInfo::required(
        "status",
        FieldType::Int32,
    )]));
    let batch = ColumnBatch::new(schema, vec![Column::Int32(vec![Some(1)])]).unwrap();

    let mut entries = Vec::new();
    let err = decode_manifest_entry_batch(
        FormatVersion::V1,
        &DecodeOptions::default(),
        &batch,
        &mut entries,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Batch columns do not match the manifest entry v1 layout"
    );
}
