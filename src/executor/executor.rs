//! Statement executor for librarydb
//!
//! This module executes schema statements against a set of named databases.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sql::ast::*;
use crate::sql::Parser;
use crate::storage::database::CATALOG_FILE;
use crate::storage::Database;

/// Statement result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Message
    pub message: String,
}

impl QueryResult {
    /// Create a result with a message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Execution engine - owns every database and the `USE`d one
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    /// Databases by name
    databases: BTreeMap<String, Database>,
    /// Current database
    current: Option<String>,
    /// Root directory for persistence
    data_dir: Option<PathBuf>,
}

impl ExecutionEngine {
    /// Create an engine that keeps everything in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Create an engine for `config`, loading every database stored in
    /// its data directory
    pub fn open(config: &Config) -> Result<Self> {
        let Some(root) = config.data_dir.clone() else {
            return Ok(Self::in_memory());
        };
        fs::create_dir_all(&root)?;

        let mut databases = BTreeMap::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if !path.join(CATALOG_FILE).is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                warn!(path = %path.display(), "skipping database directory with non-UTF-8 name");
                continue;
            };
            let db = Database::open(name.clone(), &path)?;
            databases.insert(name, db);
        }

        info!(data_dir = %root.display(), databases = databases.len(), "engine opened");
        Ok(Self {
            databases,
            current: None,
            data_dir: Some(root),
        })
    }

    /// Whether changes are written to disk
    pub fn is_persistent(&self) -> bool {
        self.data_dir.is_some()
    }

    /// Parse and execute a script, statement by statement.
    ///
    /// Nothing runs if the script does not parse. Otherwise execution stops
    /// at the first failing statement; the ones before it stay applied.
    pub fn execute_script(&mut self, sql: &str) -> Result<Vec<QueryResult>> {
        let statements = Parser::new(sql)?.parse_all()?;
        let mut results = Vec::with_capacity(statements.len());
        for stmt in &statements {
            results.push(self.execute(stmt)?);
        }
        Ok(results)
    }

    /// Execute one statement
    pub fn execute(&mut self, stmt: &Statement) -> Result<QueryResult> {
        debug!(?stmt, "executing");
        match stmt {
            Statement::CreateDatabase(s) => self.create_database(&s.name, s.if_not_exists),
            Statement::DropDatabase(s) => self.drop_database(&s.name, s.if_exists),
            Statement::Use(name) => self.use_database(name),
            Statement::CreateTable(s) => self.create_table(s),
            Statement::DropTable(s) => self.drop_table(&s.table_name, s.if_exists),
        }
    }

    fn create_database(&mut self, name: &str, if_not_exists: bool) -> Result<QueryResult> {
        check_name(name)?;
        if self.databases.contains_key(name) {
            if if_not_exists {
                return Ok(QueryResult::with_message(format!(
                    "Note: database '{}' already exists",
                    name
                )));
            }
            return Err(Error::DatabaseAlreadyExists(name.to_string()));
        }

        let db = Database::new(name);
        if let Some(dir) = self.database_dir(name) {
            db.save(dir)?;
        }
        self.databases.insert(name.to_string(), db);
        info!(database = %name, "database created");
        Ok(QueryResult::with_message(format!("Database '{}' created", name)))
    }

    fn drop_database(&mut self, name: &str, if_exists: bool) -> Result<QueryResult> {
        if !self.databases.contains_key(name) {
            if if_exists {
                return Ok(QueryResult::with_message(format!(
                    "Note: database '{}' does not exist",
                    name
                )));
            }
            return Err(Error::DatabaseNotFound(name.to_string()));
        }

        if let Some(dir) = self.database_dir(name) {
            if dir.exists() {
                fs::remove_dir_all(&dir)?;
            }
        }
        self.databases.remove(name);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        info!(database = %name, "database dropped");
        Ok(QueryResult::with_message(format!("Database '{}' dropped", name)))
    }

    /// Make `name` the current database
    pub fn use_database(&mut self, name: &str) -> Result<QueryResult> {
        if !self.databases.contains_key(name) {
            return Err(Error::DatabaseNotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(QueryResult::with_message("Database changed"))
    }

    fn create_table(&mut self, stmt: &CreateTableStatement) -> Result<QueryResult> {
        let name = &stmt.table_name;
        check_name(name)?;
        let db = self.current_database_mut()?;
        if db.has_table(name) && stmt.if_not_exists {
            return Ok(QueryResult::with_message(format!(
                "Note: table '{}' already exists",
                name
            )));
        }

        db.create_table(name, stmt.to_schema())?;
        if let Err(e) = self.persist_current() {
            self.current_database_mut()?.drop_table(name)?;
            if let Err(undo) = self.persist_current() {
                warn!(table = %name, error = %undo, "failed to restore catalog after create error");
            }
            return Err(e);
        }
        Ok(QueryResult::with_message(format!("Table '{}' created", name)))
    }

    fn drop_table(&mut self, name: &str, if_exists: bool) -> Result<QueryResult> {
        let db = self.current_database_mut()?;
        if !db.has_table(name) && if_exists {
            return Ok(QueryResult::with_message(format!(
                "Note: table '{}' does not exist",
                name
            )));
        }

        db.drop_table(name)?;
        self.persist_current()?;
        Ok(QueryResult::with_message(format!("Table '{}' dropped", name)))
    }

    /// Name of the current database
    pub fn current_database_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current database
    pub fn current_database(&self) -> Result<&Database> {
        let name = self.current.as_deref().ok_or(Error::NoDatabaseSelected)?;
        self.database(name)
    }

    /// The current database, mutably
    pub fn current_database_mut(&mut self) -> Result<&mut Database> {
        let name = self.current.clone().ok_or(Error::NoDatabaseSelected)?;
        self.database_mut(&name)
    }

    /// Get a database by name
    pub fn database(&self, name: &str) -> Result<&Database> {
        self.databases
            .get(name)
            .ok_or_else(|| Error::DatabaseNotFound(name.to_string()))
    }

    /// Get a mutable database by name
    pub fn database_mut(&mut self, name: &str) -> Result<&mut Database> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| Error::DatabaseNotFound(name.to_string()))
    }

    /// List database names, sorted
    pub fn list_databases(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }

    /// Persist one database; no-op in memory
    pub fn flush_database(&self, name: &str) -> Result<()> {
        let db = self.database(name)?;
        if let Some(dir) = self.database_dir(name) {
            db.save(dir)?;
        }
        Ok(())
    }

    /// Persist every database; no-op in memory
    pub fn flush(&self) -> Result<()> {
        for name in self.databases.keys() {
            self.flush_database(name)?;
        }
        Ok(())
    }

    fn persist_current(&self) -> Result<()> {
        match self.current.as_deref() {
            Some(name) => self.flush_database(name),
            None => Ok(()),
        }
    }

    fn database_dir(&self, name: &str) -> Option<PathBuf> {
        self.data_dir.as_deref().map(|root: &Path| root.join(name))
    }
}

/// Database and table names double as file names
fn check_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
    if bad {
        return Err(Error::ExecutionError(format!("invalid name '{}'", name)));
    }
    Ok(())
}
