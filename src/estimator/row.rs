//! Leaf row layout
//!
//! A nonclustered leaf row is laid out as:
//!
//! ```text
//! | header (1) | key columns | row locator | null bitmap | var count + offsets |
//! ```
//!
//! The row locator is either an 8 byte heap RID or the clustering key, with
//! a 4 byte uniquifier when the clustering key is not unique.

use super::types::EstimationInput;

/// Heap RID width (file id, page id, slot)
pub const HEAP_RID_BYTES: u64 = 8;

/// Uniquifier appended to a non-unique clustering key
pub const UNIQUIFIER_BYTES: u64 = 4;

/// Fixed row header byte
pub const ROW_HEADER_BYTES: u64 = 1;

/// Null bitmap column count field
const NULL_BITMAP_HEADER_BYTES: u64 = 2;

/// Variable column count field
const VARIABLE_COUNT_BYTES: u64 = 2;

/// Per variable column offset entry
const VARIABLE_OFFSET_BYTES: u64 = 2;

/// Where a leaf row finds its base table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLocator {
    /// Heap RID
    Heap,
    /// Clustering key embedded in the leaf row
    ClusteringKey { is_unique: bool },
}

/// Byte accounting for one leaf row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub key_length_bytes: u64,
    pub key_column_count: u64,
    pub leaf_column_count: u64,
    pub locator: RowLocator,
    pub row_locator_length_bytes: u64,
    pub has_nullable_key_column: bool,
    pub null_bitmap_bytes: u64,
    pub variable_column_count: u64,
    pub variable_overhead_bytes: u64,
}

impl RowLayout {
    /// Lays out one leaf row from validated input.
    pub fn compute(input: &EstimationInput) -> Self {
        let key_length_bytes: u64 = input
            .columns
            .iter()
            .map(|c| u64::from(c.max_length_bytes))
            .sum();
        let key_column_count = input.columns.len() as u64;
        let mut leaf_column_count = key_column_count;
        let mut variable_column_count =
            input.columns.iter().filter(|c| c.is_variable_length).count() as u64;

        let (locator, row_locator_length_bytes) = match &input.clustering_key {
            None => (RowLocator::Heap, HEAP_RID_BYTES),
            Some(key) => {
                leaf_column_count += u64::from(key.key_column_count);
                let mut length = u64::from(key.summed_max_length_bytes);
                if !key.is_unique {
                    // The uniquifier is stored as a variable-length column.
                    length += UNIQUIFIER_BYTES;
                    variable_column_count += 1;
                }
                variable_column_count += u64::from(key.variable_length_column_count);
                (RowLocator::ClusteringKey { is_unique: key.is_unique }, length)
            }
        };

        let has_nullable_key_column = input.has_nullable_key_column();
        let null_bitmap_bytes =
            if input.engine_tier.always_has_null_bitmap() || has_nullable_key_column {
                null_bitmap_size(leaf_column_count)
            } else {
                0
            };

        Self {
            key_length_bytes,
            key_column_count,
            leaf_column_count,
            locator,
            row_locator_length_bytes,
            has_nullable_key_column,
            null_bitmap_bytes,
            variable_column_count,
            variable_overhead_bytes: variable_overhead_size(variable_column_count),
        }
    }

    /// Total bytes of one leaf row, header included
    pub fn index_row_size_bytes(&self) -> u64 {
        self.key_length_bytes
            + self.row_locator_length_bytes
            + self.null_bitmap_bytes
            + self.variable_overhead_bytes
            + ROW_HEADER_BYTES
    }
}

/// Two byte header plus one bit per leaf column, rounded up to whole bytes
pub fn null_bitmap_size(leaf_column_count: u64) -> u64 {
    NULL_BITMAP_HEADER_BYTES + (leaf_column_count + 7) / 8
}

/// Count field plus one offset per variable column; zero without any
pub fn variable_overhead_size(variable_column_count: u64) -> u64 {
    if variable_column_count == 0 {
        0
    } else {
        VARIABLE_COUNT_BYTES + variable_column_count * VARIABLE_OFFSET_BYTES
    }
}
