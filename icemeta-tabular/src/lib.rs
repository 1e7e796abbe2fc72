//! Tabular column batch types for manifest decoding.
//!
//! This crate provides the format-agnostic columnar batch consumed by the
//! Iceberg manifest decoders. Readers (Avro, Parquet, ...) produce a
//! `ColumnBatch`; decoders only look at names, types and typed values.
//!
//! # Design
//!
//! - **Columnar storage**: Data is stored in typed `Vec` per column, not per-row
//! - **Strongly typed**: All column access is through the `Column` enum, no `dyn Any`
//! - **One level of nesting**: struct columns hold positional child columns
//! - **No Arrow dependency**: small, self-contained value model

pub mod batch;
pub mod error;

pub use batch::{BatchSchema, Column, ColumnBatch, FieldInfo, FieldType};
pub use error::{Result, TabularError};
