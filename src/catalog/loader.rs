//! Catalog snapshot loader
//!
//! Reads one JSON snapshot file from disk and validates its structure before
//! anything is resolved against it.

use std::fs;
use std::path::PathBuf;

use super::errors::{ResolveError, ResolveResult};
use super::types::CatalogSnapshot;

/// Loads catalog snapshots from disk.
pub struct CatalogLoader {
    path: PathBuf,
}

impl CatalogLoader {
    /// Creates a loader for the given snapshot file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads, parses, and validates the snapshot.
    pub fn load(&self) -> ResolveResult<CatalogSnapshot> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| ResolveError::SnapshotUnreadable {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        Self::parse(&content).map_err(|e| match e {
            ResolveError::InvalidCatalog(reason) => ResolveError::InvalidCatalog(format!(
                "{}: {}",
                self.path.display(),
                reason
            )),
            other => other,
        })
    }

    /// Parses and validates snapshot JSON.
    pub fn parse(content: &str) -> ResolveResult<CatalogSnapshot> {
        let snapshot: CatalogSnapshot = serde_json::from_str(content)
            .map_err(|e| ResolveError::InvalidCatalog(format!("invalid JSON: {}", e)))?;

        snapshot
            .validate_structure()
            .map_err(ResolveError::InvalidCatalog)?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "instance": "SQL01",
        "product_version": "12.0.2000.8",
        "captured_at": "2024-03-01T12:00:00Z",
        "databases": [{
            "name": "Sales",
            "tables": [{
                "schema": "dbo",
                "name": "Orders",
                "row_count": 42,
                "columns": [{"name": "Id", "type": "int", "max_length": 4}]
            }]
        }]
    }"#;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = CatalogLoader::new(file.path()).load().unwrap();
        assert_eq!(snapshot.instance, "SQL01");
        assert!(snapshot.captured_at.is_some());
        assert_eq!(snapshot.databases[0].tables[0].row_count, 42);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogLoader::new(dir.path().join("absent.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ResolveError::SnapshotUnreadable { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = CatalogLoader::new(file.path()).load().unwrap_err();
        assert!(matches!(err, ResolveError::InvalidCatalog(_)));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_empty_instance_rejected() {
        let err =
            CatalogLoader::parse(r#"{"instance": " ", "product_version": "11.0"}"#).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidCatalog(_)));
    }
}
