//! SQL Abstract Syntax Tree (AST)
//!
//! This module defines the AST nodes for schema statements.

use crate::catalog::{Column, DataType, Schema};

/// A schema statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE DATABASE statement
    CreateDatabase(CreateDatabaseStatement),
    /// DROP DATABASE statement
    DropDatabase(DropDatabaseStatement),
    /// USE statement
    Use(String),
    /// CREATE TABLE statement
    CreateTable(CreateTableStatement),
    /// DROP TABLE statement
    DropTable(DropTableStatement),
}

/// CREATE DATABASE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDatabaseStatement {
    pub name: String,
    pub if_not_exists: bool,
}

/// DROP DATABASE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DropDatabaseStatement {
    pub name: String,
    pub if_exists: bool,
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// Table name
    pub table_name: String,
    /// Column definitions
    pub columns: Vec<ColumnDef>,
    /// IF NOT EXISTS flag
    pub if_not_exists: bool,
}

impl CreateTableStatement {
    /// Build the catalog schema described by this statement
    pub fn to_schema(&self) -> Schema {
        Schema::from_columns(self.columns.iter().map(ColumnDef::to_column).collect())
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// NOT NULL constraint
    pub not_null: bool,
    /// PRIMARY KEY constraint
    pub primary_key: bool,
    /// AUTO_INCREMENT attribute
    pub auto_increment: bool,
}

impl ColumnDef {
    /// Convert into catalog metadata
    pub fn to_column(&self) -> Column {
        Column::new(self.name.clone(), self.data_type)
            .nullable(!self.not_null)
            .primary_key(self.primary_key)
            .auto_increment(self.auto_increment)
    }
}

/// DROP TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStatement {
    /// Table name
    pub table_name: String,
    /// IF EXISTS flag
    pub if_exists: bool,
}
