//! librarydb - an embedded relational store for a library schema
//!
//! This library provides:
//! - Schema-script parsing (lexer, parser, AST)
//! - Table catalog
//! - Storage (tables with primary-key index and auto-increment, table files)
//! - Statement execution over named databases
//! - The library schema itself (students, books, issues)

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod library;
pub mod sql;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use executor::ExecutionEngine;
