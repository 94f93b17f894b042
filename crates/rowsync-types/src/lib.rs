//! # rowsync-types
//!
//! Core data model for the rowsync table-synchronization engine.
//!
//! This crate provides:
//! - [`Value`](value::Value) - Typed column values
//! - [`KeyRange`](range::KeyRange) - Slices of a table's primary-key space
//! - [`RangeCheck`](range::RangeCheck) - Priority-ordered hash-check tasks
//! - [`Table`](schema::Table) - Table schema with stable identity

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod range;
pub mod schema;
pub mod subdivide;
pub mod value;

// Re-export commonly used types
pub use range::{KeyRange, RangeCheck, UNKNOWN_ROW_COUNT};
pub use schema::{Column, ColumnType, Table};
pub use subdivide::primary_key_subdividable;
pub use value::{ColumnValues, Value};
