//! Estimator input types
//!
//! These are the resolved facts a catalog collaborator hands to the
//! estimator. All widths are in bytes.

use serde::{Deserialize, Serialize};

use super::errors::{EstimationError, EstimationResult};

/// One index key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFact {
    /// Column name (display only)
    #[serde(default)]
    pub name: String,
    /// Catalog type name (display only)
    #[serde(default)]
    pub type_name: String,
    /// Declared maximum width in bytes
    pub max_length_bytes: u32,
    /// Whether the column allows NULL
    pub is_nullable: bool,
    /// Whether the type belongs to the variable-length family
    pub is_variable_length: bool,
}

impl ColumnFact {
    /// Create a fixed-length, non-nullable column
    pub fn fixed(name: impl Into<String>, max_length_bytes: u32) -> Self {
        Self {
            name: name.into(),
            type_name: String::new(),
            max_length_bytes,
            is_nullable: false,
            is_variable_length: false,
        }
    }

    /// Create a variable-length, non-nullable column
    pub fn variable(name: impl Into<String>, max_length_bytes: u32) -> Self {
        Self {
            is_variable_length: true,
            ..Self::fixed(name, max_length_bytes)
        }
    }

    /// Mark the column as nullable
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Attach the catalog type name
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }
}

/// Shape of the clustering key that serves as the row locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringKeyFact {
    pub is_unique: bool,
    pub key_column_count: u32,
    pub summed_max_length_bytes: u32,
    pub has_nullable_column: bool,
    pub variable_length_column_count: u32,
}

impl ClusteringKeyFact {
    /// Validates internal consistency
    pub fn validate(&self) -> EstimationResult<()> {
        if self.variable_length_column_count > self.key_column_count {
            return Err(EstimationError::invalid_input(
                "clustering_key.variable_length_column_count",
                self.variable_length_column_count,
                format!(
                    "clustering key declares more variable-length columns than its {} key columns",
                    self.key_column_count
                ),
            ));
        }
        Ok(())
    }
}

/// Engine version tier governing null bitmap presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineVersionTier {
    /// SQL Server 2008 R2 and earlier (major version < 11)
    Pre2012,
    /// SQL Server 2012 and later (major version >= 11)
    Current,
}

impl EngineVersionTier {
    /// First major version that always writes a null bitmap
    pub const CURRENT_MIN_MAJOR: u32 = 11;

    /// Tier for a product major version
    pub fn from_major_version(major: u32) -> Self {
        if major >= Self::CURRENT_MIN_MAJOR {
            EngineVersionTier::Current
        } else {
            EngineVersionTier::Pre2012
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineVersionTier::Pre2012 => "pre2012",
            EngineVersionTier::Current => "current",
        }
    }

    /// Whether the leaf row carries a null bitmap even with no nullable columns
    pub fn always_has_null_bitmap(&self) -> bool {
        matches!(self, EngineVersionTier::Current)
    }
}

/// Everything one estimate needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationInput {
    /// Index key columns, in requested order
    pub columns: Vec<ColumnFact>,
    /// Clustering key, absent for a heap
    #[serde(default)]
    pub clustering_key: Option<ClusteringKeyFact>,
    pub row_count: u64,
    pub engine_tier: EngineVersionTier,
    /// Percentage of each page filled at build time; absent means 100
    #[serde(default)]
    pub fill_factor: Option<u32>,
}

impl EstimationInput {
    /// Create an input for a heap with full pages
    pub fn new(columns: Vec<ColumnFact>, row_count: u64, engine_tier: EngineVersionTier) -> Self {
        Self {
            columns,
            clustering_key: None,
            row_count,
            engine_tier,
            fill_factor: None,
        }
    }

    /// Set the clustering key
    pub fn with_clustering_key(mut self, key: ClusteringKeyFact) -> Self {
        self.clustering_key = Some(key);
        self
    }

    /// Set the fill factor
    pub fn with_fill_factor(mut self, fill_factor: u32) -> Self {
        self.fill_factor = Some(fill_factor);
        self
    }

    /// Checks every precondition before any arithmetic runs.
    pub fn validate(&self) -> EstimationResult<()> {
        if self.row_count < 1 {
            return Err(EstimationError::invalid_input(
                "row_count",
                self.row_count,
                "row count must be at least 1",
            ));
        }

        if let Some(ff) = self.fill_factor {
            if !(1..=100).contains(&ff) {
                return Err(EstimationError::invalid_input(
                    "fill_factor",
                    ff,
                    "fill factor must be between 1 and 100",
                ));
            }
        }

        if self.columns.is_empty() {
            return Err(EstimationError::invalid_input(
                "columns",
                0,
                "an index needs at least one key column",
            ));
        }

        if let Some(key) = &self.clustering_key {
            key.validate()?;
        }

        Ok(())
    }

    /// Whether any key column or clustering column allows NULL
    pub fn has_nullable_key_column(&self) -> bool {
        self.columns.iter().any(|c| c.is_nullable)
            || self
                .clustering_key
                .as_ref()
                .map_or(false, |k| k.has_nullable_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::EstimationErrorCode;
    use serde_json::json;

    fn two_columns() -> Vec<ColumnFact> {
        vec![ColumnFact::fixed("a", 4), ColumnFact::variable("b", 4)]
    }

    #[test]
    fn test_tier_from_major_version() {
        assert_eq!(EngineVersionTier::from_major_version(10), EngineVersionTier::Pre2012);
        assert_eq!(EngineVersionTier::from_major_version(11), EngineVersionTier::Current);
        assert_eq!(EngineVersionTier::from_major_version(16), EngineVersionTier::Current);
    }

    #[test]
    fn test_zero_rows_rejected() {
        let input = EstimationInput::new(two_columns(), 0, EngineVersionTier::Current);
        let err = input.validate().unwrap_err();
        assert_eq!(err.code(), EstimationErrorCode::InvalidInput);
        assert_eq!(err.quantity(), "row_count");
    }

    #[test]
    fn test_fill_factor_bounds() {
        for ff in [0, 101] {
            let input = EstimationInput::new(two_columns(), 10, EngineVersionTier::Current)
                .with_fill_factor(ff);
            let err = input.validate().unwrap_err();
            assert_eq!(err.quantity(), "fill_factor");
        }
        for ff in [1, 50, 100] {
            let input = EstimationInput::new(two_columns(), 10, EngineVersionTier::Current)
                .with_fill_factor(ff);
            assert!(input.validate().is_ok());
        }
    }

    #[test]
    fn test_empty_columns_rejected() {
        let input = EstimationInput::new(Vec::new(), 10, EngineVersionTier::Current);
        assert_eq!(input.validate().unwrap_err().quantity(), "columns");
    }

    #[test]
    fn test_inconsistent_clustering_key_rejected() {
        let input = EstimationInput::new(two_columns(), 10, EngineVersionTier::Current)
            .with_clustering_key(ClusteringKeyFact {
                is_unique: true,
                key_column_count: 1,
                summed_max_length_bytes: 8,
                has_nullable_column: false,
                variable_length_column_count: 2,
            });
        assert_eq!(input.validate().unwrap_err().code(), EstimationErrorCode::InvalidInput);
    }

    #[test]
    fn test_input_from_json() {
        let input: EstimationInput = serde_json::from_value(json!({
            "columns": [
                {"max_length_bytes": 4, "is_nullable": false, "is_variable_length": false}
            ],
            "row_count": 5,
            "engine_tier": "pre2012"
        }))
        .unwrap();

        assert_eq!(input.engine_tier, EngineVersionTier::Pre2012);
        assert!(input.clustering_key.is_none());
        assert!(input.fill_factor.is_none());
        assert_eq!(input.columns[0].max_length_bytes, 4);
    }
}
