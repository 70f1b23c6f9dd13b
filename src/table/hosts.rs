//! The `hosts` table: one row per monitored host

use std::sync::Arc;

use crate::auth::Identity;
use crate::column::ColumnRegistry;
use crate::query::Query;
use crate::store::LiveStore;

use super::columns::register_host_columns;
use super::errors::{TableError, TableResult};
use super::rows::host_rows;
use super::{Row, Table};

/// One row per host, canonical store order. Every host appears exactly
/// once, memberships or not.
pub struct HostsTable {
    store: Arc<LiveStore>,
    columns: ColumnRegistry,
}

impl HostsTable {
    pub fn new(store: Arc<LiveStore>) -> Self {
        let mut columns = ColumnRegistry::new();
        register_host_columns(&mut columns, "");
        Self { store, columns }
    }
}

impl Table for HostsTable {
    fn name(&self) -> &'static str {
        "hosts"
    }

    fn name_prefix(&self) -> &'static str {
        "host_"
    }

    fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    fn answer_query(&self, query: &mut Query<'_>, identity: &Identity) {
        let snapshot = self.store.snapshot();
        query.scan(
            self.name(),
            &self.columns,
            identity,
            &snapshot,
            host_rows(&snapshot),
        );
    }

    /// Host names are unique, so the key→row mapping is a bijection and
    /// direct lookup is supported.
    fn find_object(&self, key: &str) -> TableResult<Row> {
        let snapshot = self.store.snapshot();
        snapshot
            .host_by_name(key)
            .map(Row::host_row)
            .ok_or_else(|| TableError::not_found(self.name(), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_object_hits_by_name() {
        let store = Arc::new(LiveStore::new());
        let h = store.add_host("web01", "", "10.0.0.1");
        let table = HostsTable::new(store);

        assert_eq!(table.find_object("web01"), Ok(Row::host_row(h)));
    }

    #[test]
    fn test_find_object_miss_is_not_found() {
        let table = HostsTable::new(Arc::new(LiveStore::new()));
        let err = table.find_object("ghost").unwrap_err();
        assert_eq!(err, TableError::not_found("hosts", "ghost"));
    }

    #[test]
    fn test_identity_and_prefix() {
        let table = HostsTable::new(Arc::new(LiveStore::new()));
        assert_eq!(table.name(), "hosts");
        assert_eq!(table.name_prefix(), "host_");
        assert!(table.columns().resolve("name").is_ok());
    }
}
