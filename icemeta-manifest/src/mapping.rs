//! Column discovery: case-insensitive name -> column locator mapping.
//!
//! Manifest entry batches embed the data file as a struct column named
//! `data_file`. Its children are flattened into the same namespace as the
//! top-level columns, so `file_path` resolves to `(data_file, [ordinal])`.

use std::collections::HashMap;

use icemeta_tabular::{BatchSchema, Column, ColumnBatch};

use crate::error::{ManifestError, Result};

/// Name of the struct column holding the data file record.
pub const DATA_FILE_COLUMN: &str = "data_file";

/// Position of a column in a batch, optionally one struct level deep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnLocator {
    primary: usize,
    children: Vec<usize>,
}

impl ColumnLocator {
    /// A top-level column.
    pub fn new(primary: usize) -> Self {
        Self {
            primary,
            children: Vec::new(),
        }
    }

    /// A child field of the struct column at `primary`.
    pub fn nested(primary: usize, child: usize) -> Self {
        Self {
            primary,
            children: vec![child],
        }
    }

    #[inline]
    pub fn primary_index(&self) -> usize {
        self.primary
    }

    #[inline]
    pub fn child_index(&self, i: usize) -> Option<usize> {
        self.children.get(i).copied()
    }

    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Resolve this locator against a batch.
    pub fn resolve<'a>(&self, batch: &'a ColumnBatch) -> Result<&'a Column> {
        let column = batch.column(self.primary).ok_or_else(|| {
            ManifestError::decode(format!(
                "Column index {} out of range ({} columns)",
                self.primary,
                batch.columns.len()
            ))
        })?;

        match self.child_index(0) {
            None => Ok(column),
            Some(child) => column.child(child).ok_or_else(|| {
                ManifestError::decode(format!(
                    "Column {} has no struct child {} (found {} data)",
                    self.primary,
                    child,
                    column.type_name()
                ))
            }),
        }
    }
}

/// Case-insensitive mapping from field name to column locator.
///
/// Keys are stored ASCII lower-cased; a repeated name overwrites the earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    entries: HashMap<String, ColumnLocator>,
}

impl NameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping, replacing any existing entry for the same name.
    pub fn insert(&mut self, name: &str, locator: ColumnLocator) {
        self.entries.insert(name.to_ascii_lowercase(), locator);
    }

    /// Look up a locator by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ColumnLocator> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    /// Check whether a name is mapped, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a locator that verification has already guaranteed.
    pub(crate) fn require(&self, name: &str) -> Result<&ColumnLocator> {
        self.get(name)
            .ok_or_else(|| ManifestError::decode(format!("Column '{}' is not mapped", name)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mapping for manifest list batches: every column maps to itself.
pub fn manifest_list_mapping(schema: &BatchSchema) -> NameMapping {
    let mut mapping = NameMapping::new();
    for (index, field) in schema.fields.iter().enumerate() {
        mapping.insert(&field.name, ColumnLocator::new(index));
    }
    mapping
}

/// Mapping for manifest entry batches, flattening the `data_file` struct.
///
/// Fails if `data_file` is present but not a struct.
pub fn manifest_entry_mapping(schema: &BatchSchema) -> Result<NameMapping> {
    let mut mapping = NameMapping::new();
    for (index, field) in schema.fields.iter().enumerate() {
        if !field.name.eq_ignore_ascii_case(DATA_FILE_COLUMN) {
            mapping.insert(&field.name, ColumnLocator::new(index));
            continue;
        }

        let children = field.field_type.struct_fields().ok_or_else(|| {
            ManifestError::schema(format!(
                "data_file must be a struct, found {}",
                field.field_type
            ))
        })?;
        for (ordinal, child) in children.iter().enumerate() {
            mapping.insert(&child.name, ColumnLocator::nested(index, ordinal));
        }
    }
    Ok(mapping)
}
