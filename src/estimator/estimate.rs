//! Size estimate and its derivation trace
//!
//! Produces deterministic, human-readable trace output. The trace is part of
//! the output contract: each step of the computation contributes the lines
//! describing the quantities it derived.

use std::fmt;

use serde::Serialize;

use super::errors::{EstimationError, EstimationResult};
use super::pages::{bytes_to_rounded_mb, PagePacking, PAGE_SIZE_BYTES};
use super::row::{RowLayout, RowLocator, HEAP_RID_BYTES, UNIQUIFIER_BYTES};
use super::types::{EngineVersionTier, EstimationInput};

/// Estimated leaf-level size of a nonclustered index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeEstimate {
    pub key_length_bytes: u64,
    pub leaf_column_count: u64,
    pub row_locator_length_bytes: u64,
    pub null_bitmap_bytes: u64,
    pub variable_column_count: u64,
    pub variable_overhead_bytes: u64,
    pub index_row_size_bytes: u64,
    pub leaf_rows_per_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_factor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_rows_per_page: Option<u64>,
    pub leaf_pages_required: u64,
    pub estimated_size_bytes: u64,
    pub estimated_size_mb: u64,
    /// Derivation lines, in computation order
    pub trace: Vec<String>,
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.trace {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Estimates the leaf-level size of a nonclustered index.
///
/// Pure: no I/O, no shared state. Every precondition is checked before any
/// arithmetic, and any failure aborts without a partial estimate.
pub fn estimate(input: &EstimationInput) -> EstimationResult<SizeEstimate> {
    input.validate()?;

    let mut trace = Vec::new();

    let layout = RowLayout::compute(input);
    trace.push(format!(
        "Index key length: {} bytes ({} columns)",
        layout.key_length_bytes, layout.key_column_count
    ));
    trace.push(format!("Leaf columns: {}", layout.leaf_column_count));
    trace.push(locator_line(&layout));

    if input.engine_tier == EngineVersionTier::Pre2012 && layout.has_nullable_key_column {
        trace.push("Leaf record contains null columns".to_string());
    }
    if layout.null_bitmap_bytes > 0 {
        trace.push(format!("Null bitmap: {} bytes", layout.null_bitmap_bytes));
    } else {
        trace.push("Null bitmap: not present".to_string());
    }

    trace.push(format!("Variable-length columns: {}", layout.variable_column_count));
    trace.push(format!(
        "Variable-length overhead: {} bytes",
        layout.variable_overhead_bytes
    ));

    let index_row_size_bytes = layout.index_row_size_bytes();
    trace.push(format!("Index row size: {} bytes", index_row_size_bytes));

    let packing = PagePacking::compute(index_row_size_bytes, input.fill_factor)?;
    trace.push(format!("Leaf rows per page: {}", packing.rows_per_page));
    if let (Some(ff), Some(free)) = (input.fill_factor, packing.free_rows_per_page) {
        trace.push(format!("Fill factor: {}%, free rows per page: {}", ff, free));
    }

    let leaf_pages_required = packing.pages_required(input.row_count);
    trace.push(format!("Leaf pages required: {}", leaf_pages_required));

    let estimated_size_bytes = leaf_pages_required
        .checked_mul(PAGE_SIZE_BYTES)
        .ok_or_else(|| {
            EstimationError::invalid_input(
                "row_count",
                input.row_count,
                "estimated size overflows 64-bit byte count",
            )
        })?;
    let estimated_size_mb = bytes_to_rounded_mb(estimated_size_bytes);
    trace.push(summary_line(estimated_size_mb));

    Ok(SizeEstimate {
        key_length_bytes: layout.key_length_bytes,
        leaf_column_count: layout.leaf_column_count,
        row_locator_length_bytes: layout.row_locator_length_bytes,
        null_bitmap_bytes: layout.null_bitmap_bytes,
        variable_column_count: layout.variable_column_count,
        variable_overhead_bytes: layout.variable_overhead_bytes,
        index_row_size_bytes,
        leaf_rows_per_page: packing.rows_per_page,
        fill_factor: input.fill_factor,
        free_rows_per_page: packing.free_rows_per_page,
        leaf_pages_required,
        estimated_size_bytes,
        estimated_size_mb,
        trace,
    })
}

fn summary_line(size_mb: u64) -> String {
    format!("Estimated nonclustered index size: {} MB", size_mb)
}

fn locator_line(layout: &RowLayout) -> String {
    match layout.locator {
        RowLocator::Heap => format!("Row locator: heap RID, {} bytes", HEAP_RID_BYTES),
        RowLocator::ClusteringKey { is_unique: true } => format!(
            "Row locator: unique clustering key, {} bytes",
            layout.row_locator_length_bytes
        ),
        RowLocator::ClusteringKey { is_unique: false } => format!(
            "Row locator: non-unique clustering key + {} byte uniquifier, {} bytes",
            UNIQUIFIER_BYTES, layout.row_locator_length_bytes
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{ClusteringKeyFact, ColumnFact, EstimationErrorCode};

    fn worked_example() -> EstimationInput {
        EstimationInput::new(
            vec![ColumnFact::fixed("id", 4), ColumnFact::variable("code", 4)],
            100_000,
            EngineVersionTier::Current,
        )
        .with_clustering_key(ClusteringKeyFact {
            is_unique: true,
            key_column_count: 1,
            summed_max_length_bytes: 4,
            has_nullable_column: false,
            variable_length_column_count: 0,
        })
    }

    #[test]
    fn test_worked_example() {
        let est = estimate(&worked_example()).unwrap();

        assert_eq!(est.key_length_bytes, 8);
        assert_eq!(est.row_locator_length_bytes, 4);
        assert_eq!(est.leaf_column_count, 3);
        assert_eq!(est.null_bitmap_bytes, 3);
        assert_eq!(est.variable_column_count, 1);
        assert_eq!(est.variable_overhead_bytes, 4);
        assert_eq!(est.index_row_size_bytes, 16);
        assert_eq!(est.leaf_rows_per_page, 449);
        assert_eq!(est.leaf_pages_required, 223);
        assert_eq!(est.estimated_size_bytes, 223 * 8192);
        assert_eq!(est.estimated_size_mb, 2);
    }

    #[test]
    fn test_trace_lines() {
        let est = estimate(&worked_example()).unwrap();
        assert_eq!(
            est.trace,
            vec![
                "Index key length: 8 bytes (2 columns)",
                "Leaf columns: 3",
                "Row locator: unique clustering key, 4 bytes",
                "Null bitmap: 3 bytes",
                "Variable-length columns: 1",
                "Variable-length overhead: 4 bytes",
                "Index row size: 16 bytes",
                "Leaf rows per page: 449",
                "Leaf pages required: 223",
                "Estimated nonclustered index size: 2 MB",
            ]
        );
    }

    #[test]
    fn test_trace_mentions_null_columns_on_pre2012() {
        let mut input = worked_example();
        input.engine_tier = EngineVersionTier::Pre2012;
        input.columns[0].is_nullable = true;

        let est = estimate(&input).unwrap();
        assert!(est.trace.iter().any(|l| l == "Leaf record contains null columns"));

        input.engine_tier = EngineVersionTier::Current;
        let est = estimate(&input).unwrap();
        assert!(!est.trace.iter().any(|l| l == "Leaf record contains null columns"));
    }

    #[test]
    fn test_trace_includes_fill_factor() {
        let est = estimate(&worked_example().with_fill_factor(80)).unwrap();
        assert!(est
            .trace
            .contains(&"Fill factor: 80%, free rows per page: 89".to_string()));
        assert_eq!(est.leaf_pages_required, 278);
    }

    #[test]
    fn test_display_ends_with_summary() {
        let est = estimate(&worked_example()).unwrap();
        let text = est.to_string();
        assert!(text.ends_with("Estimated nonclustered index size: 2 MB\n"));
    }

    #[test]
    fn test_zero_rows_rejected_before_arithmetic() {
        let mut input = worked_example();
        input.row_count = 0;
        let err = estimate(&input).unwrap_err();
        assert_eq!(err.code(), EstimationErrorCode::InvalidInput);
    }

    #[test]
    fn test_size_overflow_is_rejected() {
        let mut input = worked_example();
        input.row_count = u64::MAX;
        let err = estimate(&input).unwrap_err();
        assert_eq!(err.code(), EstimationErrorCode::InvalidInput);
    }
}
