//! Catalog snapshot type definitions
//!
//! A snapshot is a JSON export of the catalog facts a live resolver would
//! query: instance and product version, databases with their state, tables
//! with row counts, columns (as `sys.columns` reports them) and indexes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type names whose storage is variable-length
pub const VARIABLE_LENGTH_TYPES: [&str; 6] =
    ["text", "ntext", "image", "varbinary", "varchar", "nvarchar"];

/// Catalog `max_length` of a MAX type
pub const MAX_LENGTH_UNBOUNDED: i32 = -1;

/// Widest `max_length` a non-MAX column can declare
pub const MAX_LENGTH_BOUNDED: i32 = 8000;

/// Whether a catalog type name belongs to the variable-length family
pub fn is_variable_length_type(type_name: &str) -> bool {
    VARIABLE_LENGTH_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(type_name.trim()))
}

/// Column as recorded in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Width in bytes, `-1` for MAX types
    pub max_length: i32,
    #[serde(default)]
    pub is_nullable: bool,
}

impl CatalogColumn {
    pub fn is_variable_length(&self) -> bool {
        is_variable_length_type(&self.type_name)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_length == MAX_LENGTH_UNBOUNDED
    }
}

/// Index kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Heap,
    Clustered,
    Nonclustered,
}

/// Index as recorded in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub name: String,
    #[serde(rename = "type")]
    pub index_type: IndexType,
    #[serde(default)]
    pub is_unique: bool,
    /// Key column names, in key order
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Table as recorded in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTable {
    #[serde(default = "default_schema")]
    pub schema: String,
    pub name: String,
    pub row_count: u64,
    pub columns: Vec<CatalogColumn>,
    #[serde(default)]
    pub indexes: Vec<CatalogIndex>,
}

impl CatalogTable {
    /// Looks up a column by name, case-insensitively
    pub fn column(&self, name: &str) -> Option<&CatalogColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// All clustered indexes (a valid table has at most one)
    pub fn clustered_indexes(&self) -> impl Iterator<Item = &CatalogIndex> {
        self.indexes
            .iter()
            .filter(|i| i.index_type == IndexType::Clustered)
    }

    /// Schema-qualified name
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Database as recorded in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDatabase {
    pub name: String,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub tables: Vec<CatalogTable>,
}

impl CatalogDatabase {
    pub fn is_online(&self) -> bool {
        self.state.eq_ignore_ascii_case("online")
    }

    /// Looks up a table by schema and name, case-insensitively
    pub fn table(&self, schema: &str, name: &str) -> Option<&CatalogTable> {
        self.tables.iter().find(|t| {
            t.schema.eq_ignore_ascii_case(schema) && t.name.eq_ignore_ascii_case(name)
        })
    }
}

/// Complete catalog snapshot of one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub instance: String,
    /// Product version string, e.g. `11.0.3000.0`
    pub product_version: String,
    /// When the snapshot was exported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub databases: Vec<CatalogDatabase>,
}

impl CatalogSnapshot {
    /// Looks up a database by name, case-insensitively
    pub fn database(&self, name: &str) -> Option<&CatalogDatabase> {
        self.databases
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Validates the snapshot structure itself (not a request)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.instance.trim().is_empty() {
            return Err("instance name must not be empty".into());
        }

        for db in &self.databases {
            for table in &db.tables {
                let qualified = format!("{}.{}", db.name, table.qualified_name());
                if table.clustered_indexes().count() > 1 {
                    return Err(format!(
                    "table '{}' has more than one clustered index",
                    qualified
                ));
                }
                for column in &table.columns {
                    if column.max_length < MAX_LENGTH_UNBOUNDED
                        || column.max_length > MAX_LENGTH_BOUNDED
                    {
                        return Err(format!(
                            "column '{}' of table '{}' has invalid max_length {}",
                            column.name, qualified, column.max_length
                        ));
                    }
                }
                for index in &table.indexes {
                    let missing = index.columns.iter().find(|c| table.column(c).is_none());
                    if let Some(missing) = missing {
                        return Err(format!(
                            "index '{}' on table '{}' references unknown column '{}'",
                            index.name, qualified, missing
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

fn default_schema() -> String {
    "dbo".to_string()
}

fn default_state() -> String {
    "ONLINE".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variable_length_family() {
        for name in VARIABLE_LENGTH_TYPES {
            assert!(is_variable_length_type(name));
        }
        assert!(is_variable_length_type("NVARCHAR"));
        assert!(!is_variable_length_type("int"));
        assert!(!is_variable_length_type("char"));
        assert!(!is_variable_length_type("nchar"));
        assert!(!is_variable_length_type("uniqueidentifier"));
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot: CatalogSnapshot = serde_json::from_value(json!({
            "instance": "SQL01",
            "product_version": "10.50.1600.1",
            "databases": [{
                "name": "Sales",
                "tables": [{
                    "name": "Orders",
                    "row_count": 10,
                    "columns": [{"name": "Id", "type": "int", "max_length": 4}]
                }]
            }]
        }))
        .unwrap();

        let db = snapshot.database("sales").unwrap();
        assert!(db.is_online());
        let table = db.table("DBO", "orders").unwrap();
        assert_eq!(table.schema, "dbo");
        assert!(table.indexes.is_empty());
        assert!(!table.column("id").unwrap().is_nullable);
        assert!(snapshot.captured_at.is_none());
    }

    #[test]
    fn test_two_clustered_indexes_rejected() {
        let snapshot: CatalogSnapshot = serde_json::from_value(json!({
            "instance": "SQL01",
            "product_version": "11.0.2100.60",
            "databases": [{
                "name": "Sales",
                "tables": [{
                    "name": "Orders",
                    "row_count": 10,
                    "columns": [{"name": "Id", "type": "int", "max_length": 4}],
                    "indexes": [
                        {"name": "CX1", "type": "clustered", "columns": ["Id"]},
                        {"name": "CX2", "type": "clustered", "columns": ["Id"]}
                    ]
                }]
            }]
        }))
        .unwrap();

        let err = snapshot.validate_structure().unwrap_err();
        assert!(err.contains("more than one clustered index"));
    }

    #[test]
    fn test_index_on_unknown_column_rejected() {
        let snapshot: CatalogSnapshot = serde_json::from_value(json!({
            "instance": "SQL01",
            "product_version": "11.0.2100.60",
            "databases": [{
                "name": "Sales",
                "tables": [{
                    "name": "Orders",
                    "row_count": 10,
                    "columns": [{"name": "Id", "type": "int", "max_length": 4}],
                    "indexes": [{"name": "CX", "type": "clustered", "columns": ["Nope"]}]
                }]
            }]
        }))
        .unwrap();

        assert!(snapshot.validate_structure().unwrap_err().contains("Nope"));
    }

    #[test]
    fn test_max_length_bounds() {
        let snapshot_with = |max_length: i32| -> CatalogSnapshot {
            serde_json::from_value(json!({
                "instance": "SQL01",
                "product_version": "11.0.2100.60",
                "databases": [{
                    "name": "Sales",
                    "tables": [{
                        "name": "Orders",
                        "row_count": 10,
                        "columns": [{"name": "Body", "type": "varbinary", "max_length": max_length}]
                    }]
                }]
            }))
            .unwrap()
        };

        assert!(snapshot_with(MAX_LENGTH_UNBOUNDED).validate_structure().is_ok());
        assert!(snapshot_with(MAX_LENGTH_BOUNDED).validate_structure().is_ok());
        assert!(snapshot_with(-2).validate_structure().is_err());
        let err = snapshot_with(8001).validate_structure().unwrap_err();
        assert!(err.contains("invalid max_length 8001"));
    }
}
