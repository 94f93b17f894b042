//! Typed column values

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single typed column value.
///
/// The scheduler core treats these as opaque; they exist so key-range
/// boundaries can carry real row data between the retrieval and hashing
/// stages without re-parsing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// SQL NULL
    Null,
    /// Signed integer
    Integer(i64),
    /// Floating-point number
    Real(f64),
    /// Text string
    Text(String),
    /// Raw bytes
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// An ordered tuple of column values identifying a point in a table's
/// primary-key ordering. An empty sequence means "unbounded" when used as
/// a range endpoint.
pub type ColumnValues = Vec<Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Integer(0).is_null());
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(42i64), Value::Integer(42));
        assert_eq!(Value::from("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::from("x".to_string()), Value::Text("x".to_string()));
    }

    #[test]
    fn test_key_point_equality() {
        let a: ColumnValues = vec![Value::Integer(1), Value::Text("a".into())];
        let b: ColumnValues = vec![Value::Integer(1), Value::Text("a".into())];
        assert_eq!(a, b);
    }
}
