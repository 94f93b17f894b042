//! Key ranges and range-check tasks

use crate::value::ColumnValues;
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel meaning "row count not estimated".
///
/// `u64::MAX` can never collide with a real row count.
pub const UNKNOWN_ROW_COUNT: u64 = u64::MAX;

/// A contiguous slice of a table's primary-key space.
///
/// Rows with key `k` belong to the range when `lower < k <= upper`; an
/// empty endpoint means unbounded on that side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyRange {
    /// Exclusive lower bound
    pub lower: ColumnValues,
    /// Inclusive upper bound
    pub upper: ColumnValues,
}

impl KeyRange {
    /// Create a new key range.
    pub fn new(lower: ColumnValues, upper: ColumnValues) -> Self {
        Self { lower, upper }
    }

    /// The whole key space (both endpoints unbounded).
    pub fn whole_table() -> Self {
        Self {
            lower: Vec::new(),
            upper: Vec::new(),
        }
    }
}

/// One unit of "compare rows in this range by hash".
///
/// These are the only shareable units of work: each carries everything a
/// borrowing worker needs, so it can run on any thread.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeCheck {
    /// Range to hash-compare
    pub range: KeyRange,
    /// Estimated rows in the range, or [`UNKNOWN_ROW_COUNT`]
    pub estimated_rows: u64,
    /// Rows per hash batch
    pub rows_per_hash: u64,
    /// Scheduling priority; larger is served first
    pub priority: u64,
}

impl RangeCheck {
    /// Create a new range-check task.
    pub fn new(range: KeyRange, estimated_rows: u64, rows_per_hash: u64, priority: u64) -> Self {
        Self {
            range,
            estimated_rows,
            rows_per_hash,
            priority,
        }
    }

    /// Returns true when the row count was not estimated.
    pub fn rows_unknown(&self) -> bool {
        self.estimated_rows == UNKNOWN_ROW_COUNT
    }
}

// Ordering is by priority only, so a max-BinaryHeap serves the largest
// priority first. Equal priorities compare equal; ties are unordered.
impl PartialEq for RangeCheck {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for RangeCheck {}

impl PartialOrd for RangeCheck {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RangeCheck {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::collections::BinaryHeap;

    fn check(priority: u64) -> RangeCheck {
        RangeCheck::new(KeyRange::whole_table(), UNKNOWN_ROW_COUNT, 1000, priority)
    }

    #[test]
    fn test_whole_table_range() {
        let range = KeyRange::whole_table();
        assert!(range.lower.is_empty());
        assert!(range.upper.is_empty());
    }

    #[test]
    fn test_range_endpoints() {
        let range = KeyRange::new(vec![Value::Integer(10)], vec![Value::Integer(20)]);
        assert_eq!(range.lower, vec![Value::Integer(10)]);
        assert_eq!(range.upper, vec![Value::Integer(20)]);
    }

    #[test]
    fn test_rows_unknown_sentinel() {
        assert!(check(1).rows_unknown());

        let known = RangeCheck::new(KeyRange::whole_table(), 500, 1000, 1);
        assert!(!known.rows_unknown());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(check(9) > check(5));
        assert!(check(1) < check(5));
        assert_eq!(check(5), check(5));
    }

    #[test]
    fn test_heap_pops_largest_priority_first() {
        let mut heap = BinaryHeap::new();
        for priority in [5u64, 1, 9, 3] {
            heap.push(check(priority));
        }

        let popped: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|c| c.priority)).collect();
        assert_eq!(popped, vec![9, 5, 3, 1]);
    }
}
