//! A named database: its catalog plus table storage
//!
//! On disk a database is a directory holding `catalog.json` and one
//! `<table>.tbl` file per table.

use super::codec::{decode_table, encode_table};
use super::table::Table;
use crate::catalog::{Catalog, Schema, TableDef};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// File holding the catalog inside a database directory
pub const CATALOG_FILE: &str = "catalog.json";
/// Extension of table data files
pub const TABLE_EXTENSION: &str = "tbl";

/// A database with its tables
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    catalog: Catalog,
    tables: HashMap<String, Table>,
}

impl Database {
    /// Create a new empty database
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: Catalog::new(),
            tables: HashMap::new(),
        }
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table metadata of this database
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Create a table and its (empty) storage
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<Arc<TableDef>> {
        let def = self.catalog.create_table(name, schema)?;
        self.tables.insert(name.to_string(), Table::new(def.clone()));
        info!(database = %self.name, table = %name, "table created");
        Ok(def)
    }

    /// Drop a table together with its rows
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        self.catalog.drop_table(name)?;
        self.tables.remove(name);
        info!(database = %self.name, table = %name, "table dropped");
        Ok(())
    }

    /// Check if a table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.catalog.table_exists(name)
    }

    /// Get a table by name
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Get a mutable table by name
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// List all table names, sorted
    pub fn list_tables(&self) -> Vec<String> {
        self.catalog.list_tables()
    }

    /// Write the catalog and every table into `dir`
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        self.catalog.save_to_disk(dir.join(CATALOG_FILE))?;

        for (name, table) in &self.tables {
            let bytes = encode_table(table.sequence(), table.scan());
            fs::write(table_path(dir, name), &bytes)?;
        }

        // Remove data files of tables that no longer exist.
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TABLE_EXTENSION) {
                continue;
            }
            let stale = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map_or(false, |stem| !self.tables.contains_key(stem));
            if stale {
                fs::remove_file(&path)?;
            }
        }

        debug!(database = %self.name, dir = %dir.display(), "database saved");
        Ok(())
    }

    /// Open a database previously written with [`Database::save`]
    pub fn open(name: impl Into<String>, dir: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let dir = dir.as_ref();
        let catalog = Catalog::load_from_disk(dir.join(CATALOG_FILE))?;

        let mut tables = HashMap::new();
        for table_name in catalog.list_tables() {
            let def = catalog.get_table(&table_name)?;
            let path = table_path(dir, &table_name);
            let table = if path.exists() {
                let bytes = fs::read(&path)?;
                let data = decode_table(&path.display().to_string(), &bytes)?;
                Table::restore(def, data.sequence, data.rows)?
            } else {
                Table::new(def)
            };
            tables.insert(table_name, table);
        }

        info!(database = %name, tables = tables.len(), "database opened");
        Ok(Self {
            name,
            catalog,
            tables,
        })
    }
}

fn table_path(dir: &Path, table: &str) -> std::path::PathBuf {
    dir.join(format!("{}.{}", table, TABLE_EXTENSION))
}
