//! Columnar batch format for manifest metadata.
//!
//! A `ColumnBatch` stores data in typed column vectors with schema
//! information. Struct columns carry their child columns positionally, one
//! child per declared struct field, so nested records such as the Iceberg
//! `data_file` can be addressed as `(column, child ordinal)`.
//!
//! # Design
//!
//! - **Columnar storage**: Data is stored in typed `Vec` per column, not per-row
//! - **Strongly typed**: All column access is through the `Column` enum, no `dyn Any`
//! - **Names are positional labels**: the schema keeps declared names verbatim;
//!   case folding and flattening belong to the consumer

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TabularError};

/// Tabular field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Int32,
    Int64,
    String,
    /// Struct with its child fields in declared order.
    Struct(Vec<FieldInfo>),
}

impl FieldType {
    /// Check if this is a struct type.
    #[inline]
    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// Child fields of a struct type, `None` for primitives.
    pub fn struct_fields(&self) -> Option<&[FieldInfo]> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32 => f.write_str("int"),
            Self::Int64 => f.write_str("long"),
            Self::String => f.write_str("string"),
            Self::Struct(fields) => {
                f.write_str("struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.field_type)?;
                }
                f.write_str(">")
            }
        }
    }
}

/// Field information for a column in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Column name as declared by the producer.
    pub name: String,
    /// Field type.
    pub field_type: FieldType,
    /// Whether the field allows nulls.
    pub nullable: bool,
}

impl FieldInfo {
    /// Create a nullable field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
        }
    }

    /// Create a non-nullable field.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
        }
    }
}

/// Schema for a column batch.
#[derive(Debug, Clone)]
pub struct BatchSchema {
    /// Field definitions in column order.
    pub fields: Vec<FieldInfo>,
    /// Exact-name lookup (debug/UX).
    name_to_index: HashMap<String, usize>,
}

impl BatchSchema {
    /// Create a new batch schema from field definitions.
    pub fn new(fields: Vec<FieldInfo>) -> Self {
        let name_to_index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        Self {
            fields,
            name_to_index,
        }
    }

    /// Get field index by exact name.
    #[inline]
    pub fn index_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Get field info by position.
    #[inline]
    pub fn field(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    /// Number of fields in the schema.
    #[inline]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }
}

/// Column storage - typed arrays with optional values (nullable).
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int32(Vec<Option<i32>>),
    Int64(Vec<Option<i64>>),
    String(Vec<Option<String>>),
    /// Struct: one child column per declared field, all `len` rows long.
    Struct { children: Vec<Column>, len: usize },
}

impl Column {
    /// Create an empty column of the given type.
    pub fn empty(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Int32 => Self::Int32(Vec::new()),
            FieldType::Int64 => Self::Int64(Vec::new()),
            FieldType::String => Self::String(Vec::new()),
            FieldType::Struct(fields) => Self::Struct {
                children: fields.iter().map(|f| Self::empty(&f.field_type)).collect(),
                len: 0,
            },
        }
    }

    /// Build a struct column from its children, checking they agree on length.
    pub fn new_struct(children: Vec<Column>) -> Result<Self> {
        let len = children.first().map_or(0, |c| c.len());
        for (i, child) in children.iter().enumerate() {
            if child.len() != len {
                return Err(TabularError::Schema(format!(
                    "Row count mismatch: struct child {} has {} rows, expected {}",
                    i,
                    child.len(),
                    len
                )));
            }
        }
        Ok(Self::Struct { children, len })
    }

    /// Get the number of rows in this column.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Struct { len, .. } => *len,
        }
    }

    /// Check if the column is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if value at index is null.
    ///
    /// Struct rows are never null; out-of-range indices report null.
    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        match self {
            Self::Int32(v) => v.get(idx).map_or(true, |v| v.is_none()),
            Self::Int64(v) => v.get(idx).map_or(true, |v| v.is_none()),
            Self::String(v) => v.get(idx).map_or(true, |v| v.is_none()),
            Self::Struct { len, .. } => idx >= *len,
        }
    }

    /// Short type name, matching the `FieldType` display names.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int32(_) => "int",
            Self::Int64(_) => "long",
            Self::String(_) => "string",
            Self::Struct { .. } => "struct",
        }
    }

    /// Check whether the column storage matches a declared field type.
    pub fn matches_type(&self, field_type: &FieldType) -> bool {
        match (self, field_type) {
            (Self::Int32(_), FieldType::Int32)
            | (Self::Int64(_), FieldType::Int64)
            | (Self::String(_), FieldType::String) => true,
            (Self::Struct { children, .. }, FieldType::Struct(fields)) => {
                children.len() == fields.len()
                    && children
                        .iter()
                        .zip(fields)
                        .all(|(c, f)| c.matches_type(&f.field_type))
            }
            _ => false,
        }
    }

    /// Get i32 value at index (returns None if wrong type or null).
    #[inline]
    pub fn get_i32(&self, idx: usize) -> Option<i32> {
        match self {
            Self::Int32(v) => v.get(idx).and_then(|v| *v),
            _ => None,
        }
    }

    /// Get i64 value at index (returns None if wrong type or null).
    #[inline]
    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        match self {
            Self::Int64(v) => v.get(idx).and_then(|v| *v),
            _ => None,
        }
    }

    /// Get string value at index (returns None if wrong type or null).
    #[inline]
    pub fn get_string(&self, idx: usize) -> Option<&str> {
        match self {
            Self::String(v) => v.get(idx).and_then(|v| v.as_deref()),
            _ => None,
        }
    }

    /// Child columns of a struct column.
    #[inline]
    pub fn children(&self) -> Option<&[Column]> {
        match self {
            Self::Struct { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Check that every struct child, at any depth, holds the struct's row count.
    ///
    /// `Struct` fields are public, so a hand-built column can skip
    /// [`Column::new_struct`]; batch construction re-checks here.
    fn check_struct_rows(&self) -> Result<()> {
        if let Self::Struct { children, len } = self {
            for (i, child) in children.iter().enumerate() {
                if child.len() != *len {
                    return Err(TabularError::Schema(format!(
                        "Row count mismatch: struct child {} has {} rows, expected {}",
                        i,
                        child.len(),
                        len
                    )));
                }
                child.check_struct_rows()?;
            }
        }
        Ok(())
    }

    /// Child column of a struct column by ordinal.
    #[inline]
    pub fn child(&self, ordinal: usize) -> Option<&Column> {
        self.children().and_then(|c| c.get(ordinal))
    }
}

/// Columnar batch of rows sharing one schema.
#[derive(Debug, Clone)]
pub struct ColumnBatch {
    /// Schema for this batch.
    pub schema: Arc<BatchSchema>,
    /// Column data in schema order.
    pub columns: Vec<Column>,
    /// Number of rows in the batch.
    pub num_rows: usize,
}

impl ColumnBatch {
    /// Create a new column batch.
    pub fn new(schema: Arc<BatchSchema>, columns: Vec<Column>) -> Result<Self> {
        if columns.len() != schema.num_fields() {
            return Err(TabularError::Schema(format!(
                "Column count mismatch: schema has {} fields, got {} columns",
                schema.num_fields(),
                columns.len()
            )));
        }

        let num_rows = columns.first().map_or(0, |c| c.len());

        for (i, (col, field)) in columns.iter().zip(&schema.fields).enumerate() {
            if !col.matches_type(&field.field_type) {
                return Err(TabularError::Schema(format!(
                    "Type mismatch: column {} ('{}') declared as {}, got {} data",
                    i,
                    field.name,
                    field.field_type,
                    col.type_name()
                )));
            }
            if col.len() != num_rows {
                return Err(TabularError::Schema(format!(
                    "Row count mismatch: column {} has {} rows, expected {}",
                    i,
                    col.len(),
                    num_rows
                )));
            }
            col.check_struct_rows()?;
        }

        Ok(Self {
            schema,
            columns,
            num_rows,
        })
    }

    /// Create an empty batch with the given schema.
    pub fn empty(schema: Arc<BatchSchema>) -> Self {
        let columns = schema
            .fields
            .iter()
            .map(|f| Column::empty(&f.field_type))
            .collect();
        Self {
            schema,
            columns,
            num_rows: 0,
        }
    }

    /// Get column by exact name (convenience for debug/UX).
    #[inline]
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.schema.index_by_name(name).map(|i| &self.columns[i])
    }

    /// Get column by index.
    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Check if the batch is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Iterator over row indices.
    pub fn row_indices(&self) -> impl Iterator<Item = usize> {
        0..self.num_rows
    }
}
