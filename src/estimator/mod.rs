//! Index Size Estimator
//!
//! Turns resolved catalog facts into an estimate of the leaf-level size of a
//! nonclustered index, together with a derivation trace.
//!
//! # Design Principles
//!
//! - Pure: no I/O, no logging, no shared state
//! - Deterministic: same input, same estimate and trace
//! - Integer byte accounting throughout
//! - Invalid input or impossible page geometry aborts with no partial result
//!
//! # Computation Order
//!
//! 1. Key length and leaf column count
//! 2. Row locator (heap RID or clustering key)
//! 3. Null bitmap
//! 4. Variable-length overhead
//! 5. Index row size
//! 6. Rows per page
//! 7. Leaf pages, honoring fill factor
//! 8. Size in bytes and megabytes

mod errors;
mod estimate;
mod pages;
mod row;
mod types;

pub use errors::{EstimationError, EstimationErrorCode, EstimationResult, Severity};
pub use estimate::{estimate, SizeEstimate};
pub use pages::{PagePacking, PAGE_SIZE_BYTES, SLOT_ENTRY_BYTES, USABLE_PAGE_BYTES};
pub use row::{RowLayout, RowLocator, HEAP_RID_BYTES, ROW_HEADER_BYTES, UNIQUIFIER_BYTES};
pub use types::{ClusteringKeyFact, ColumnFact, EngineVersionTier, EstimationInput};
