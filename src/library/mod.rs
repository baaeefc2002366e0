//! Library management schema
//!
//! The `students`, `books` and `issues` tables, the script that creates them,
//! and typed access to their rows.

pub mod records;
pub mod schema;
pub mod store;

pub use records::{Book, Issue, NewBook, NewIssue, Student};
pub use schema::{install, BOOKS, ISSUES, LIBRARY_DATABASE, LIBRARY_SCHEMA, STUDENTS};
pub use store::Library;
