//! Column registry for livequery
//!
//! A table's columns are named, typed projections from a row to a
//! [`Value`]. Each table builds its registry once at construction; the set
//! is immutable afterwards. Accessors must never fail on rows produced by
//! the owning table's row source: a handle that no longer resolves under
//! the snapshot yields [`Value::Absent`].

mod errors;

pub use errors::{ColumnError, ColumnResult};

use std::collections::HashMap;
use std::fmt;

use crate::store::StatusStore;
use crate::table::Row;
use crate::value::{Value, ValueType};

/// Projection from a row to a value, evaluated under one snapshot.
///
/// Pure and side-effect free: same row, same snapshot, same value.
pub type Accessor = Box<dyn Fn(&Row, &StatusStore) -> Value + Send + Sync>;

/// A registered column: name, declared type, accessor
pub struct Column {
    name: String,
    value_type: ValueType,
    accessor: Accessor,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Resolves this column for one row under one snapshot
    pub fn resolve(&self, row: &Row, store: &StatusStore) -> Value {
        (self.accessor)(row, store)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .finish()
    }
}

/// The fixed column set of one table.
///
/// Registration order is preserved and used when a query requests no
/// explicit columns.
#[derive(Debug, Default)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
    by_name: HashMap<String, usize>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column. Column sets are wired with literal names at table
    /// construction, so a duplicate name is a programming error.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        value_type: ValueType,
        accessor: Accessor,
    ) {
        let name = name.into();
        assert!(
            !self.by_name.contains_key(&name),
            "duplicate column registration: {name}"
        );
        self.by_name.insert(name.clone(), self.columns.len());
        self.columns.push(Column {
            name,
            value_type,
            accessor,
        });
    }

    /// Looks up a column by name
    pub fn resolve(&self, name: &str) -> ColumnResult<&Column> {
        self.index_of(name).map(|idx| &self.columns[idx])
    }

    /// Looks up a column's registry index by name
    pub fn index_of(&self, name: &str) -> ColumnResult<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ColumnError::unknown(name))
    }

    /// Returns the column at a registry index.
    ///
    /// Indices come from [`index_of`](Self::index_of) on the same registry,
    /// so this cannot miss.
    pub fn get(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    /// Column names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
