//! Table schema and stable identity

use sha2::{Digest, Sha256};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column type, as far as the scheduler core needs to know it.
///
/// Only enough detail to decide key-space subdivision; drivers map their
/// native type systems onto this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnType {
    /// Integer of any width
    Integer,
    /// Floating-point number
    Real,
    /// Text string
    Text,
    /// Raw bytes
    Blob,
    /// Date/time value
    Timestamp,
    /// Driver-specific type with no portable mapping
    Unknown,
}

/// A single column definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type
    pub column_type: ColumnType,
}

impl Column {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A table under synchronization.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table {
    /// Schema (namespace) the table lives in, if any
    pub schema: Option<String>,
    /// Table name
    pub name: String,
    /// Column definitions
    pub columns: Vec<Column>,
    /// Primary key as indexes into `columns`, in key order; empty means
    /// the table has no usable primary key
    pub primary_key: Vec<usize>,
}

impl Table {
    /// Create a new table definition without a schema qualifier.
    pub fn new(name: impl Into<String>, columns: Vec<Column>, primary_key: Vec<usize>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns,
            primary_key,
        }
    }

    /// Schema-qualified name (`schema.name`, or the bare name).
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    /// Stable identifier derived from the qualified name.
    ///
    /// Hex of the first 16 bytes of SHA-256 over the qualified name; stable
    /// across runs and safe to use in protocol messages regardless of what
    /// characters the table name contains.
    pub fn table_id(&self) -> String {
        let digest = Sha256::digest(self.qualified_name().as_bytes());
        hex::encode(&digest[..16])
    }

    /// Iterator over the primary-key columns, in key order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.primary_key.iter().filter_map(|&idx| self.columns.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_table() -> Table {
        Table::new(
            "users",
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("email", ColumnType::Text),
            ],
            vec![0],
        )
    }

    #[test]
    fn test_qualified_name() {
        let mut table = users_table();
        assert_eq!(table.qualified_name(), "users");

        table.schema = Some("public".to_string());
        assert_eq!(table.qualified_name(), "public.users");
    }

    #[test]
    fn test_table_id_stable() {
        assert_eq!(users_table().table_id(), users_table().table_id());
        assert_eq!(users_table().table_id().len(), 32);
    }

    #[test]
    fn test_table_id_distinguishes_schema() {
        let bare = users_table();
        let mut qualified = users_table();
        qualified.schema = Some("audit".to_string());

        assert_ne!(bare.table_id(), qualified.table_id());
    }

    #[test]
    fn test_primary_key_columns() {
        let table = Table::new(
            "events",
            vec![
                Column::new("payload", ColumnType::Blob),
                Column::new("id", ColumnType::Integer),
                Column::new("at", ColumnType::Timestamp),
            ],
            vec![1, 2],
        );

        let names: Vec<&str> = table.primary_key_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "at"]);
    }
}
