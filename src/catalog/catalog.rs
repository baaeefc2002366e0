//! Catalog for one database
//!
//! This module manages metadata about the tables of a single database.

use super::schema::{Column, Schema, TableDef};
use super::types::DataType;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Table catalog - manages the table definitions of a database
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Table definitions by name
    tables: HashMap<String, Arc<TableDef>>,
    /// Next table ID
    next_table_id: u32,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            next_table_id: 1,
        }
    }

    /// Create a new table
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<Arc<TableDef>> {
        if self.tables.contains_key(name) {
            return Err(Error::TableAlreadyExists(name.to_string()));
        }
        schema.validate(name)?;

        let table_def = Arc::new(TableDef::new(name, schema, self.next_table_id));
        self.next_table_id += 1;

        self.tables.insert(name.to_string(), table_def.clone());
        Ok(table_def)
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Result<Arc<TableDef>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Drop a table
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        match self.tables.remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::TableNotFound(name.to_string())),
        }
    }

    /// List all table names, sorted
    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get table schema info as a formatted string (for .schema command)
    pub fn get_table_info(&self, name: &str) -> Result<String> {
        let table = self.get_table(name)?;
        let mut info = format!("Table: {}\n", table.name());
        info.push_str("Columns:\n");

        for col in table.schema().columns() {
            let mut flags = Vec::new();
            if col.primary_key {
                flags.push("PRIMARY KEY");
            }
            if col.auto_increment {
                flags.push("AUTO_INCREMENT");
            }
            if !col.nullable && !col.primary_key {
                flags.push("NOT NULL");
            }

            let flags_str = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };

            info.push_str(&format!("  {} {}{}\n", col.name, col.data_type, flags_str));
        }

        Ok(info)
    }

    /// Save catalog to disk
    pub fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut tables: Vec<TableDef> = self.tables.values().map(|t| (**t).clone()).collect();
        tables.sort_by_key(|t| t.id);

        let data = CatalogData {
            tables,
            next_table_id: self.next_table_id,
        };

        let json = serde_json::to_string_pretty(&data)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load catalog from disk
    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let data: CatalogData = serde_json::from_str(&json)?;

        let mut tables = HashMap::new();
        for mut table in data.tables {
            table.schema.reindex();
            tables.insert(table.name.clone(), Arc::new(table));
        }

        Ok(Self {
            tables,
            next_table_id: data.next_table_id,
        })
    }
}

/// Serializable proxy for Catalog
#[derive(serde::Serialize, serde::Deserialize)]
struct CatalogData {
    tables: Vec<TableDef>,
    next_table_id: u32,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating tables with a fluent API
pub struct TableBuilder {
    name: String,
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Start building a new table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a nullable column
    pub fn column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(Column::new(name, data_type));
        self
    }

    /// Add a primary key column
    pub fn primary_key(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns
            .push(Column::new(name, data_type).primary_key(true));
        self
    }

    /// Add an `INT AUTO_INCREMENT PRIMARY KEY` column
    pub fn auto_id(mut self, name: impl Into<String>) -> Self {
        self.columns.push(
            Column::new(name, DataType::Integer)
                .primary_key(true)
                .auto_increment(true),
        );
        self
    }

    /// Name of the table being built
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finish into a schema
    pub fn into_schema(self) -> Schema {
        Schema::from_columns(self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students() -> Schema {
        TableBuilder::new("students")
            .primary_key("roll_no", DataType::Varchar(20))
            .column("name", DataType::Varchar(100))
            .into_schema()
    }

    #[test]
    fn test_create_and_get_table() {
        let mut catalog = Catalog::new();

        let table = catalog.create_table("students", students()).unwrap();

        assert_eq!(table.name(), "students");
        assert_eq!(table.schema().column_count(), 2);
        assert_eq!(table.id, 1);

        let retrieved = catalog.get_table("students").unwrap();
        assert_eq!(retrieved.name(), "students");
    }

    #[test]
    fn test_table_already_exists() {
        let mut catalog = Catalog::new();

        catalog.create_table("students", students()).unwrap();

        let result = catalog.create_table("students", students());
        assert!(matches!(result, Err(Error::TableAlreadyExists(_))));
    }

    #[test]
    fn test_invalid_schema_not_registered() {
        let mut catalog = Catalog::new();
        let result = catalog.create_table("empty", Schema::new());
        assert!(matches!(result, Err(Error::InvalidSchema(_, _))));
        assert!(!catalog.table_exists("empty"));
    }

    #[test]
    fn test_drop_table() {
        let mut catalog = Catalog::new();

        catalog.create_table("students", students()).unwrap();
        assert!(catalog.table_exists("students"));

        catalog.drop_table("students").unwrap();
        assert!(!catalog.table_exists("students"));
        assert!(matches!(
            catalog.drop_table("students"),
            Err(Error::TableNotFound(_))
        ));
    }

    #[test]
    fn test_table_builder() {
        let builder = TableBuilder::new("books")
            .auto_id("id")
            .column("title", DataType::Varchar(255))
            .column("author", DataType::Varchar(150));
        let name = builder.name().to_string();

        let mut catalog = Catalog::new();
        let table = catalog.create_table(&name, builder.into_schema()).unwrap();

        let id_col = table.get_column("id").unwrap();
        assert!(id_col.primary_key);
        assert!(id_col.auto_increment);
    }

    #[test]
    fn test_table_info() {
        let mut catalog = Catalog::new();
        catalog.create_table("students", students()).unwrap();

        let info = catalog.get_table_info("students").unwrap();
        assert!(info.contains("roll_no VARCHAR(20) [PRIMARY KEY]"));
        assert!(info.contains("name VARCHAR(100)\n"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut catalog = Catalog::new();
        catalog.create_table("students", students()).unwrap();
        catalog.save_to_disk(&path).unwrap();

        let mut loaded = Catalog::load_from_disk(&path).unwrap();
        let table = loaded.get_table("students").unwrap();
        assert_eq!(table.schema().get_column_index("name"), Some(1));

        let next = loaded
            .create_table("other", TableBuilder::new("other").auto_id("id").into_schema())
            .unwrap();
        assert_eq!(next.id, 2);
    }
}
