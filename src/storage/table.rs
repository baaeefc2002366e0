//! Table storage for librarydb
//!
//! This module combines a table definition, its rows and its primary-key
//! index to provide row-level operations.

use super::sequence::AutoIncrement;
use super::tuple::{Tuple, Value};
use crate::catalog::{Schema, TableDef};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Internal row identifier, stable for the lifetime of a row
pub type RowId = u64;

/// A table combining schema and storage
#[derive(Debug, Clone)]
pub struct Table {
    /// Table definition (metadata)
    def: Arc<TableDef>,
    /// Rows in insertion order
    rows: IndexMap<RowId, Tuple>,
    /// Primary-key value to row
    primary_index: HashMap<Value, RowId>,
    /// Sequence for the auto-increment column, if the table has one
    sequence: Option<AutoIncrement>,
    /// Next internal row id
    next_row_id: RowId,
    /// Id generated by the most recent insert
    last_insert_id: Option<i64>,
}

impl Table {
    /// Create a new empty table
    pub fn new(def: Arc<TableDef>) -> Self {
        let sequence = def
            .schema()
            .auto_increment_index()
            .map(|_| AutoIncrement::new());
        Self {
            def,
            rows: IndexMap::new(),
            primary_index: HashMap::new(),
            sequence,
            next_row_id: 0,
            last_insert_id: None,
        }
    }

    /// Rebuild a table from persisted rows and sequence state
    pub fn restore(
        def: Arc<TableDef>,
        sequence: Option<AutoIncrement>,
        rows: Vec<Tuple>,
    ) -> Result<Self> {
        let mut table = Self::new(def);
        for tuple in rows {
            table.insert(tuple)?;
        }
        // The persisted counter may be ahead of the surviving rows.
        if let (Some(current), Some(saved)) = (table.sequence.as_mut(), sequence) {
            if saved.peek() > current.peek() {
                *current = saved;
            }
        }
        table.last_insert_id = None;
        Ok(table)
    }

    /// Get table name
    pub fn name(&self) -> &str {
        self.def.name()
    }

    /// Get table schema
    pub fn schema(&self) -> &Schema {
        self.def.schema()
    }

    /// Get table definition
    pub fn definition(&self) -> &Arc<TableDef> {
        &self.def
    }

    /// Auto-increment state, if the table has such a column
    pub fn sequence(&self) -> Option<AutoIncrement> {
        self.sequence
    }

    /// Id generated by the most recent successful insert
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    /// Insert a full-width tuple into the table.
    ///
    /// A NULL in the auto-increment column is replaced with the next
    /// sequence value. Returns the row as stored.
    pub fn insert(&mut self, mut tuple: Tuple) -> Result<Tuple> {
        self.check_width(&tuple)?;

        let mut generated = None;
        if let (Some(idx), Some(seq)) = (self.schema().auto_increment_index(), self.sequence) {
            if tuple.get(idx).map_or(false, Value::is_null) {
                let id = seq.peek();
                tuple.set(idx, Value::Integer(id));
                generated = Some(id);
            }
        }

        self.check_values(&tuple)?;

        let key = self.primary_key_of(&tuple);
        if let Some(key) = &key {
            if self.primary_index.contains_key(key) {
                return Err(Error::PrimaryKeyViolation(
                    self.name().to_string(),
                    key.to_string(),
                ));
            }
        }

        let row_id = self.next_row_id;
        self.next_row_id += 1;
        if let Some(key) = key {
            debug!(table = %self.def.name, key = %key, "row inserted");
            self.primary_index.insert(key, row_id);
        }
        self.observe_sequence(&tuple);
        if generated.is_some() {
            self.last_insert_id = generated;
        }
        self.rows.insert(row_id, tuple.clone());

        Ok(tuple)
    }

    /// Insert a row given as `(column, value)` pairs.
    ///
    /// Columns not mentioned are NULL, which lets the auto-increment column
    /// generate its value.
    pub fn insert_named(&mut self, values: &[(&str, Value)]) -> Result<Tuple> {
        let schema = self.schema();
        let mut row = vec![Value::Null; schema.column_count()];
        for (name, value) in values {
            let idx = schema.get_column_index(name).ok_or_else(|| {
                Error::ColumnNotFound(name.to_string(), self.name().to_string())
            })?;
            row[idx] = value.clone();
        }
        self.insert(Tuple::new(row))
    }

    /// Get a row by primary-key value
    pub fn get(&self, key: &Value) -> Result<Option<&Tuple>> {
        self.require_primary_key()?;
        Ok(self
            .primary_index
            .get(key)
            .and_then(|row_id| self.rows.get(row_id)))
    }

    /// Delete a row by primary-key value, returning it.
    ///
    /// Nothing references rows across tables, so deletes never cascade.
    pub fn delete(&mut self, key: &Value) -> Result<Tuple> {
        self.require_primary_key()?;
        let row_id = self
            .primary_index
            .remove(key)
            .ok_or_else(|| Error::RowNotFound(self.name().to_string(), key.to_string()))?;

        let tuple = self
            .rows
            .shift_remove(&row_id)
            .ok_or_else(|| Error::Internal(format!("index entry without row {}", row_id)))?;
        debug!(table = %self.def.name, key = %key, "row deleted");
        Ok(tuple)
    }

    /// Replace the row stored under `key`
    pub fn update(&mut self, key: &Value, tuple: Tuple) -> Result<()> {
        self.require_primary_key()?;
        self.check_width(&tuple)?;
        self.check_values(&tuple)?;

        let row_id = *self
            .primary_index
            .get(key)
            .ok_or_else(|| Error::RowNotFound(self.name().to_string(), key.to_string()))?;

        if let Some(new_key) = self.primary_key_of(&tuple) {
            if &new_key != key {
                if self.primary_index.contains_key(&new_key) {
                    return Err(Error::PrimaryKeyViolation(
                        self.name().to_string(),
                        new_key.to_string(),
                    ));
                }
                self.primary_index.remove(key);
                self.primary_index.insert(new_key, row_id);
            }
        }

        self.observe_sequence(&tuple);
        self.rows.insert(row_id, tuple);
        Ok(())
    }

    /// Scan all rows in insertion order
    pub fn scan(&self) -> impl ExactSizeIterator<Item = &Tuple> + '_ {
        self.rows.values()
    }

    /// Get row count
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn require_primary_key(&self) -> Result<()> {
        match self.schema().primary_key_index() {
            Some(_) => Ok(()),
            None => Err(Error::NoPrimaryKey(self.name().to_string())),
        }
    }

    fn primary_key_of(&self, tuple: &Tuple) -> Option<Value> {
        self.schema()
            .primary_key_index()
            .and_then(|idx| tuple.get(idx).cloned())
    }

    fn observe_sequence(&mut self, tuple: &Tuple) {
        let idx = self.def.schema().auto_increment_index();
        if let (Some(seq), Some(idx)) = (self.sequence.as_mut(), idx) {
            if let Some(value) = tuple.get(idx).and_then(Value::as_i64) {
                seq.observe(value);
            }
        }
    }

    fn check_width(&self, tuple: &Tuple) -> Result<()> {
        let expected = self.schema().column_count();
        if tuple.len() != expected {
            return Err(Error::ColumnCountMismatch {
                expected,
                found: tuple.len(),
            });
        }
        Ok(())
    }

    /// Check NOT NULL, type and length constraints
    fn check_values(&self, tuple: &Tuple) -> Result<()> {
        for (col, value) in self.schema().columns().iter().zip(tuple) {
            match value {
                Value::Null => {
                    if !col.nullable {
                        return Err(Error::NullNotAllowed(col.name.clone()));
                    }
                }
                Value::Integer(i) => {
                    let (min, max) = col.data_type.integer_range().ok_or_else(|| {
                        Error::TypeMismatch {
                            column: col.name.clone(),
                            from: value.type_name().to_string(),
                            to: col.data_type.to_string(),
                        }
                    })?;
                    if *i < min || *i > max {
                        return Err(Error::ValueTooLarge(col.name.clone()));
                    }
                }
                Value::String(s) => {
                    if !col.data_type.is_string() {
                        return Err(Error::TypeMismatch {
                            column: col.name.clone(),
                            from: value.type_name().to_string(),
                            to: col.data_type.to_string(),
                        });
                    }
                    if let Some(max) = col.data_type.max_len() {
                        if s.chars().count() > max {
                            return Err(Error::ValueTooLarge(col.name.clone()));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
