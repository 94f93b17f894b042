//! Primary-key subdivision predicate

use crate::schema::{ColumnType, Table};

/// Returns true when the table's key space can be split into sub-ranges.
///
/// Subdivision needs every primary-key column to have an orderable scalar
/// type the retrieval layer can compute midpoints over. Tables without a
/// primary key are never subdividable (they are synchronized whole).
pub fn primary_key_subdividable(table: &Table) -> bool {
    if table.primary_key.is_empty() {
        return false;
    }
    table.primary_key_columns().all(|column| {
        matches!(
            column.column_type,
            ColumnType::Integer | ColumnType::Real | ColumnType::Text | ColumnType::Timestamp
        )
    })
}
