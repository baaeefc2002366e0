//! Storage engine module
//!
//! This module contains the storage engine components:
//! - Values and tuples
//! - Auto-increment sequences
//! - Tables with a primary-key index
//! - Binary table files and database directories

pub mod codec;
pub mod database;
pub mod sequence;
pub mod table;
pub mod tuple;

pub use database::Database;
pub use sequence::AutoIncrement;
pub use table::{RowId, Table};
pub use tuple::{Tuple, Value};
