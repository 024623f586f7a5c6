//! Metadata resolution
//!
//! Turns an instance/database/schema/table/column identity into the
//! `TableLayoutFacts` the estimator consumes. Checks run in a fixed order so
//! the first failure reported is always the outermost one:
//!
//! 1. Instance reachable
//! 2. Database exists and is online
//! 3. Table exists
//! 4. Requested columns exist and can be index keys
//! 5. Clustering key discovered from the clustered index
//! 6. Engine tier derived from the product version

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::estimator::{ClusteringKeyFact, ColumnFact, EngineVersionTier, EstimationInput};

use super::errors::{ResolveError, ResolveResult};
use super::types::{CatalogColumn, CatalogIndex, CatalogSnapshot, CatalogTable};

static MAJOR_VERSION_RE: OnceLock<Regex> = OnceLock::new();

/// Identity of the index to estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Instance name; `None` accepts whatever instance the source describes
    pub instance: Option<String>,
    pub database: String,
    pub schema: String,
    pub table: String,
    /// Index key columns, in key order
    pub columns: Vec<String>,
}

impl ResolveRequest {
    /// Creates a request for a `dbo` table on any instance
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            instance: None,
            database: database.into(),
            schema: "dbo".to_string(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Rejects empty and duplicate column lists
    pub fn validate(&self) -> ResolveResult<()> {
        if self.columns.is_empty() {
            return Err(ResolveError::InvalidRequest(
                "at least one index column is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.trim().is_empty() {
                return Err(ResolveError::InvalidRequest("empty column name".into()));
            }
            if !seen.insert(column.to_ascii_lowercase()) {
                return Err(ResolveError::InvalidRequest(format!(
                    "column '{}' listed more than once",
                    column
                )));
            }
        }

        Ok(())
    }
}

/// Resolved facts about the table an index will be built on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLayoutFacts {
    pub instance: String,
    pub database: String,
    pub schema: String,
    pub table: String,
    pub product_version: String,
    pub engine_tier: EngineVersionTier,
    /// Rows currently in the table
    pub row_count: u64,
    pub columns: Vec<ColumnFact>,
    /// `None` for a heap
    pub clustering_key: Option<ClusteringKeyFact>,
}

impl TableLayoutFacts {
    /// Builds the estimator input; an explicit row count wins over the counted one.
    pub fn into_input(
        self,
        row_count_override: Option<u64>,
        fill_factor: Option<u32>,
    ) -> EstimationInput {
        EstimationInput {
            columns: self.columns,
            clustering_key: self.clustering_key,
            row_count: row_count_override.unwrap_or(self.row_count),
            engine_tier: self.engine_tier,
            fill_factor,
        }
    }
}

/// Source of table layout facts (read-only)
pub trait MetadataResolver {
    /// Resolves the facts for one index request
    fn resolve(&self, request: &ResolveRequest) -> ResolveResult<TableLayoutFacts>;
}

/// Resolver backed by an in-memory catalog snapshot
pub struct SnapshotResolver {
    snapshot: CatalogSnapshot,
}

impl SnapshotResolver {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    fn locate_table(&self, request: &ResolveRequest) -> ResolveResult<&CatalogTable> {
        if let Some(requested) = &request.instance {
            if !requested.eq_ignore_ascii_case(&self.snapshot.instance) {
                return Err(ResolveError::InstanceUnavailable {
                    requested: requested.clone(),
                    available: self.snapshot.instance.clone(),
                });
            }
        }

        let database = self
            .snapshot
            .database(&request.database)
            .ok_or_else(|| ResolveError::DatabaseNotFound(request.database.clone()))?;

        if !database.is_online() {
            return Err(ResolveError::DatabaseOffline {
                database: database.name.clone(),
                state: database.state.clone(),
            });
        }

        database
            .table(&request.schema, &request.table)
            .ok_or_else(|| ResolveError::TableNotFound {
                database: database.name.clone(),
                schema: request.schema.clone(),
                table: request.table.clone(),
            })
    }
}

impl MetadataResolver for SnapshotResolver {
    fn resolve(&self, request: &ResolveRequest) -> ResolveResult<TableLayoutFacts> {
        request.validate()?;

        let table = self.locate_table(request)?;

        let columns = request
            .columns
            .iter()
            .map(|name| {
                let column = table.column(name).ok_or_else(|| ResolveError::ColumnNotFound {
                    table: table.qualified_name(),
                    column: name.clone(),
                })?;
                key_column_fact(column)
            })
            .collect::<ResolveResult<Vec<_>>>()?;

        let clustering_key = match table.clustered_indexes().next() {
            Some(index) => Some(clustering_key_fact(table, index)?),
            None => None,
        };

        let major = parse_major_version(&self.snapshot.product_version)?;

        Ok(TableLayoutFacts {
            instance: self.snapshot.instance.clone(),
            database: request.database.clone(),
            schema: table.schema.clone(),
            table: table.name.clone(),
            product_version: self.snapshot.product_version.clone(),
            engine_tier: EngineVersionTier::from_major_version(major),
            row_count: table.row_count,
            columns,
            clustering_key,
        })
    }
}

/// Extracts the leading major version from a product version string.
///
/// `11.0.3000.0` yields 11; `9.00.5000` yields 9.
pub fn parse_major_version(version: &str) -> ResolveResult<u32> {
    let re = MAJOR_VERSION_RE
        .get_or_init(|| Regex::new(r"^\s*(\d+)(?:\.|\s*$)").expect("valid regex"));

    re.captures(version)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| {
            ResolveError::InvalidCatalog(format!("unrecognized product version '{}'", version))
        })
}

fn key_column_fact(column: &CatalogColumn) -> ResolveResult<ColumnFact> {
    let width = column_width(column)?;
    let fact = if column.is_variable_length() {
        ColumnFact::variable(&column.name, width)
    } else {
        ColumnFact::fixed(&column.name, width)
    }
    .with_type_name(&column.type_name);

    Ok(if column.is_nullable { fact.nullable() } else { fact })
}

fn column_width(column: &CatalogColumn) -> ResolveResult<u32> {
    if column.is_unbounded() {
        return Err(ResolveError::UnsupportedKeyColumn {
            column: column.name.clone(),
            type_name: format!("{}(max)", column.type_name),
        });
    }

    u32::try_from(column.max_length).map_err(|_| {
        ResolveError::InvalidCatalog(format!(
            "column '{}' has invalid max_length {}",
            column.name, column.max_length
        ))
    })
}

fn clustering_key_fact(
    table: &CatalogTable,
    index: &CatalogIndex,
) -> ResolveResult<ClusteringKeyFact> {
    let mut fact = ClusteringKeyFact {
        is_unique: index.is_unique,
        key_column_count: 0,
        summed_max_length_bytes: 0,
        has_nullable_column: false,
        variable_length_column_count: 0,
    };

    for name in &index.columns {
        let column = table.column(name).ok_or_else(|| {
            ResolveError::InvalidCatalog(format!(
                "clustered index '{}' references unknown column '{}'",
                index.name, name
            ))
        })?;
        fact.key_column_count += 1;
        fact.summed_max_length_bytes = fact
            .summed_max_length_bytes
            .checked_add(column_width(column)?)
            .ok_or_else(|| {
                ResolveError::InvalidCatalog(format!(
                    "clustered index '{}' key width overflows",
                    index.name
                ))
            })?;
        fact.has_nullable_column |= column.is_nullable;
        if column.is_variable_length() {
            fact.variable_length_column_count += 1;
        }
    }

    Ok(fact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_version() {
        assert_eq!(parse_major_version("11.0.3000.0").unwrap(), 11);
        assert_eq!(parse_major_version("10.50.1600.1").unwrap(), 10);
        assert_eq!(parse_major_version("9.00.5000.00").unwrap(), 9);
        assert_eq!(parse_major_version("16").unwrap(), 16);
        assert!(parse_major_version("SQL Server 2012").is_err());
        assert!(parse_major_version("").is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(ResolveRequest::new("db", "t", Vec::<String>::new()).validate().is_err());
        assert!(ResolveRequest::new("db", "t", ["a", "A"]).validate().is_err());
        assert!(ResolveRequest::new("db", "t", ["a", "b"]).validate().is_ok());
    }

    #[test]
    fn test_override_wins_over_counted_rows() {
        let facts = TableLayoutFacts {
            instance: "SQL01".into(),
            database: "Sales".into(),
            schema: "dbo".into(),
            table: "Orders".into(),
            product_version: "11.0".into(),
            engine_tier: EngineVersionTier::Current,
            row_count: 10,
            columns: vec![ColumnFact::fixed("Id", 4)],
            clustering_key: None,
        };

        assert_eq!(facts.clone().into_input(None, None).row_count, 10);
        let input = facts.into_input(Some(5_000), Some(90));
        assert_eq!(input.row_count, 5_000);
        assert_eq!(input.fill_factor, Some(90));
    }
}
