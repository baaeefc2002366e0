//! Schema definitions for librarydb
//!
//! This module defines table schemas and column metadata.

use super::types::DataType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column definition in a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Column position (0-indexed)
    pub position: usize,
    /// Is this column nullable?
    pub nullable: bool,
    /// Is this the primary key?
    pub primary_key: bool,
    /// Does the store generate values for this column?
    pub auto_increment: bool,
}

impl Column {
    /// Create a new nullable column
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            position: 0,
            nullable: true,
            primary_key: false,
            auto_increment: false,
        }
    }

    /// Set nullable flag
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set primary key flag
    pub fn primary_key(mut self, pk: bool) -> Self {
        self.primary_key = pk;
        if pk {
            self.nullable = false;
        }
        self
    }

    /// Set auto-increment flag
    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }
}

/// Table schema - defines the structure of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of columns
    columns: Vec<Column>,
    /// Column name to index mapping
    #[serde(skip)]
    name_to_index: HashMap<String, usize>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema from a list of columns
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let mut schema = Self::new();
        for col in columns {
            schema.add_column(col);
        }
        schema
    }

    /// Add a column to the schema
    pub fn add_column(&mut self, mut column: Column) {
        column.position = self.columns.len();
        // First definition wins the lookup; `validate` reports the duplicate.
        self.name_to_index
            .entry(column.name.clone())
            .or_insert(column.position);
        self.columns.push(column);
    }

    /// Rebuild the name lookup after deserialization
    pub(crate) fn reindex(&mut self) {
        self.name_to_index = self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.position))
            .collect();
    }

    /// Check the structural rules a table definition must satisfy
    pub fn validate(&self, table: &str) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidSchema(table.to_string(), msg));

        if self.columns.is_empty() {
            return invalid("a table needs at least one column".to_string());
        }
        if self.name_to_index.len() != self.columns.len() {
            return invalid("duplicate column name".to_string());
        }

        let pk: Vec<&Column> = self.columns.iter().filter(|c| c.primary_key).collect();
        if pk.len() > 1 {
            return invalid("multiple primary keys defined".to_string());
        }

        let auto: Vec<&Column> = self.columns.iter().filter(|c| c.auto_increment).collect();
        match auto.as_slice() {
            [] => {}
            [col] => {
                if !col.data_type.is_integer() {
                    return invalid(format!(
                        "AUTO_INCREMENT column '{}' must be an integer",
                        col.name
                    ));
                }
                if !col.primary_key {
                    return invalid(format!(
                        "AUTO_INCREMENT column '{}' must be the primary key",
                        col.name
                    ));
                }
            }
            _ => return invalid("more than one AUTO_INCREMENT column".to_string()),
        }

        Ok(())
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.name_to_index.get(name).map(|&idx| &self.columns[idx])
    }

    /// Get column index by name
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Get all columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Position of the primary-key column, if any
    pub fn primary_key_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.primary_key)
    }

    /// Position of the auto-increment column, if any
    pub fn auto_increment_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.auto_increment)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Table definition - full table metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name
    pub name: String,
    /// Table schema
    pub schema: Schema,
    /// Table ID (for internal use)
    pub id: u32,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>, schema: Schema, id: u32) -> Self {
        Self {
            name: name.into(),
            schema,
            id,
        }
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.schema.get_column(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books_schema() -> Schema {
        Schema::from_columns(vec![
            Column::new("id", DataType::Integer)
                .primary_key(true)
                .auto_increment(true),
            Column::new("title", DataType::Varchar(255)),
            Column::new("author", DataType::Varchar(150)),
        ])
    }

    #[test]
    fn test_schema_creation() {
        let schema = books_schema();

        assert_eq!(schema.column_count(), 3);
        assert!(schema.has_column("title"));
        assert!(!schema.has_column("isbn"));
        assert_eq!(schema.get_column_index("author"), Some(2));
        assert_eq!(schema.primary_key_index(), Some(0));
        assert_eq!(schema.auto_increment_index(), Some(0));

        let id_col = schema.get_column("id").unwrap();
        assert!(id_col.primary_key);
        assert!(!id_col.nullable);
        assert!(schema.get_column("title").unwrap().nullable);
        schema.validate("books").unwrap();
    }

    #[test]
    fn test_auto_increment_requires_integer_primary_key() {
        let schema = Schema::from_columns(vec![
            Column::new("id", DataType::Integer).auto_increment(true),
            Column::new("title", DataType::Text),
        ]);
        assert!(matches!(
            schema.validate("books"),
            Err(Error::InvalidSchema(_, _))
        ));

        let schema = Schema::from_columns(vec![Column::new("code", DataType::Varchar(10))
            .primary_key(true)
            .auto_increment(true)]);
        assert!(schema.validate("codes").is_err());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let schema = Schema::from_columns(vec![
            Column::new("name", DataType::Text),
            Column::new("name", DataType::Text),
        ]);
        assert!(schema.validate("students").is_err());
        assert_eq!(schema.get_column_index("name"), Some(0));
    }

    #[test]
    fn test_reindex_after_roundtrip() {
        let schema = books_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let mut restored: Schema = serde_json::from_str(&json).unwrap();
        assert!(!restored.has_column("id"));
        restored.reindex();
        assert_eq!(restored, schema);
    }

    #[test]
    fn test_table_def() {
        let table = TableDef::new("books", books_schema(), 1);

        assert_eq!(table.name(), "books");
        assert_eq!(table.schema().column_count(), 3);
        assert!(table.get_column("id").is_some());
    }
}
