//! The `hostsbygroup` table: the host↔group membership relation
//! denormalized into one row per (host, group) edge

use std::sync::Arc;

use crate::auth::Identity;
use crate::column::ColumnRegistry;
use crate::query::Query;
use crate::store::LiveStore;

use super::columns::{register_group_columns, register_host_columns};
use super::rows::host_group_edge_rows;
use super::Table;

/// One row per membership edge, host side primary.
///
/// Rows carry the full host column set plus the group columns under the
/// `hostgroup_` prefix, so filters can reference either side of the join.
/// A host with no memberships yields no rows here; query `hosts` for
/// every-host-once semantics.
///
/// Visibility gates on the host only. Groups are a coarser concept than
/// hosts in this domain: a contact allowed to see a host may see which
/// groups that host is in, while a group's existence alone reveals
/// nothing about hosts the contact cannot see.
pub struct HostsByGroupTable {
    store: Arc<LiveStore>,
    columns: ColumnRegistry,
}

impl HostsByGroupTable {
    pub fn new(store: Arc<LiveStore>) -> Self {
        let mut columns = ColumnRegistry::new();
        register_host_columns(&mut columns, "");
        register_group_columns(&mut columns, "hostgroup_");
        Self { store, columns }
    }
}

impl Table for HostsByGroupTable {
    fn name(&self) -> &'static str {
        "hostsbygroup"
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
            host_group_edge_rows(&snapshot),
        );
    }

    // NOTE: find_object is deliberately not overridden. A host can be part
    // of many host groups, so a host key does not determine a unique row;
    // the default UnsupportedOperation rejection is the correct answer for
    // every input.
}
