//! Error types for librarydb
//!
//! This module defines all error types used throughout the store.

use thiserror::Error;

/// The main error type for librarydb
#[derive(Error, Debug)]
pub enum Error {
    // ========== Lexer Errors ==========
    #[error("Lexer error: unexpected character '{0}' at position {1}")]
    UnexpectedCharacter(char, usize),

    #[error("Lexer error: unterminated string or identifier starting at position {0}")]
    UnterminatedString(usize),

    #[error("Lexer error: invalid number format at position {0}")]
    InvalidNumber(usize),

    // ========== Parser Errors ==========
    #[error("Parse error: unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Parse error: unexpected end of input, expected {0}")]
    UnexpectedEof(String),

    #[error("Parse error: {0} is not supported")]
    Unsupported(String),

    // ========== Catalog Errors ==========
    #[error("Catalog error: database '{0}' already exists")]
    DatabaseAlreadyExists(String),

    #[error("Catalog error: database '{0}' not found")]
    DatabaseNotFound(String),

    #[error("Catalog error: no database selected")]
    NoDatabaseSelected,

    #[error("Catalog error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Catalog error: table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("Catalog error: column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Catalog error: invalid definition for table '{0}': {1}")]
    InvalidSchema(String, String),

    // ========== Type Errors ==========
    #[error("Type error: cannot store {from} in column '{column}' of type {to}")]
    TypeMismatch {
        column: String,
        from: String,
        to: String,
    },

    #[error("Type error: null value not allowed for column '{0}'")]
    NullNotAllowed(String),

    #[error("Type error: value too large for column '{0}'")]
    ValueTooLarge(String),

    // ========== Execution Errors ==========
    #[error("Execution error: expected {expected} values, got {found}")]
    ColumnCountMismatch { expected: usize, found: usize },

    #[error("Execution error: duplicate entry '{1}' for primary key of table '{0}'")]
    PrimaryKeyViolation(String, String),

    #[error("Execution error: no row with key '{1}' in table '{0}'")]
    RowNotFound(String, String),

    #[error("Execution error: table '{0}' has no primary key")]
    NoPrimaryKey(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    // ========== Storage Errors ==========
    #[error("Storage error: corrupted data in '{0}': {1}")]
    CorruptedData(String, String),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for librarydb operations
pub type Result<T> = std::result::Result<T, Error>;
