//! idxsize - Nonclustered index size estimation from catalog metadata
//!
//! - `estimator`: pure leaf-row layout and page-packing arithmetic
//! - `catalog`: metadata resolution from a catalog snapshot
//! - `observability`: structured JSON event logging
//! - `cli`: command-line glue

pub mod catalog;
pub mod cli;
pub mod estimator;
pub mod observability;
