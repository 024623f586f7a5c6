//! Metadata Resolver subsystem for idxsize
//!
//! Resolves the catalog facts an estimate depends on: column widths and
//! nullability, variable-length family membership, clustering key shape,
//! engine version tier, and row count.
//!
//! # Design Principles
//!
//! - All catalog I/O lives here, never in the estimator
//! - Existence is validated before any fact is produced
//! - A failed resolution means the estimator is not called
//!
//! Resolution sources implement `MetadataResolver`. `SnapshotResolver`
//! works from a JSON catalog snapshot loaded by `CatalogLoader`.

mod errors;
mod loader;
mod resolver;
mod types;

pub use errors::{ResolveError, ResolveResult};
pub use loader::CatalogLoader;
pub use resolver::{
    parse_major_version, MetadataResolver, ResolveRequest, SnapshotResolver, TableLayoutFacts,
};
pub use types::{
    is_variable_length_type, CatalogColumn, CatalogDatabase, CatalogIndex, CatalogSnapshot,
    CatalogTable, IndexType, VARIABLE_LENGTH_TYPES,
};
