//! Statement execution module
//!
//! Runs parsed schema statements against the engine's databases.

pub mod executor;

pub use executor::{ExecutionEngine, QueryResult};
