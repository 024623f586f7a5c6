//! # Catalog Errors
//!
//! Failures raised while resolving table layout facts. None of these reach
//! the estimator: a failed resolution means the estimate is never attempted.

use thiserror::Error;

/// Result type for catalog operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Catalog and resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    // ==================
    // Snapshot Errors
    // ==================

    /// Snapshot file could not be read
    #[error("Failed to read catalog snapshot '{path}': {reason}")]
    SnapshotUnreadable { path: String, reason: String },

    /// Snapshot content is structurally invalid
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    // ==================
    // Existence Errors
    // ==================

    /// Requested instance is not the one described by the snapshot
    #[error("Instance '{requested}' is not reachable (catalog describes '{available}')")]
    InstanceUnavailable { requested: String, available: String },

    /// Database not present
    #[error("Database '{0}' does not exist")]
    DatabaseNotFound(String),

    /// Database present but not online
    #[error("Database '{database}' is not online (state: {state})")]
    DatabaseOffline { database: String, state: String },

    /// Table not present in the database
    #[error("Table '{schema}.{table}' does not exist in database '{database}'")]
    TableNotFound {
        database: String,
        schema: String,
        table: String,
    },

    /// Column not present in the table
    #[error("Column '{column}' does not exist in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    // ==================
    // Request Errors
    // ==================

    /// Request itself is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Column type cannot be an index key
    #[error("Column '{column}' of type {type_name} cannot be an index key column")]
    UnsupportedKeyColumn { column: String, type_name: String },
}

impl ResolveError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::SnapshotUnreadable { .. } => "IDX_RESOLVE_SNAPSHOT_UNREADABLE",
            ResolveError::InvalidCatalog(_) => "IDX_RESOLVE_INVALID_CATALOG",
            ResolveError::InstanceUnavailable { .. } => "IDX_RESOLVE_INSTANCE_UNAVAILABLE",
            ResolveError::DatabaseNotFound(_) => "IDX_RESOLVE_DATABASE_NOT_FOUND",
            ResolveError::DatabaseOffline { .. } => "IDX_RESOLVE_DATABASE_OFFLINE",
            ResolveError::TableNotFound { .. } => "IDX_RESOLVE_TABLE_NOT_FOUND",
            ResolveError::ColumnNotFound { .. } => "IDX_RESOLVE_COLUMN_NOT_FOUND",
            ResolveError::InvalidRequest(_) => "IDX_RESOLVE_INVALID_REQUEST",
            ResolveError::UnsupportedKeyColumn { .. } => "IDX_RESOLVE_UNSUPPORTED_KEY_COLUMN",
        }
    }

    /// Whether the failure is about the target's reachability rather than its shape
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            ResolveError::SnapshotUnreadable { .. }
                | ResolveError::InstanceUnavailable { .. }
                | ResolveError::DatabaseOffline { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_object() {
        let err = ResolveError::ColumnNotFound {
            table: "dbo.Orders".into(),
            column: "Missing".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Missing"));
        assert!(msg.contains("dbo.Orders"));
        assert_eq!(err.code(), "IDX_RESOLVE_COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_connectivity_classification() {
        assert!(ResolveError::DatabaseOffline {
            database: "Sales".into(),
            state: "OFFLINE".into()
        }
        .is_connectivity());
        assert!(!ResolveError::DatabaseNotFound("Sales".into()).is_connectivity());
    }
}
