//! Tables: named virtual relations over the live store
//!
//! A table binds a column registry to a row source. The contract is one
//! flat trait plus per-table composition — no hierarchy. `find_object` is
//! an optional capability: the default body rejects it with
//! `UnsupportedOperation`, and only tables with a genuine key→row
//! bijection override it.

mod columns;
mod errors;
mod hosts;
mod hosts_by_group;
mod rows;

pub use errors::{TableError, TableResult};
pub use hosts::HostsTable;
pub use hosts_by_group::HostsByGroupTable;

use crate::auth::Identity;
use crate::column::ColumnRegistry;
use crate::query::Query;
use crate::store::{GroupId, HostId};

/// One result unit: a transient tuple of entity handles.
///
/// A row owns nothing; its handles are only meaningful under the snapshot
/// that produced it. Simple tables fill the host side, join tables fill
/// both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub host: Option<HostId>,
    pub group: Option<GroupId>,
}

impl Row {
    /// A single-entity row for a host
    pub fn host_row(host: HostId) -> Self {
        Self {
            host: Some(host),
            group: None,
        }
    }

    /// A join row for one (host, group) membership edge
    pub fn edge(host: HostId, group: GroupId) -> Self {
        Self {
            host: Some(host),
            group: Some(group),
        }
    }
}

/// The table contract exposed to the protocol layer.
pub trait Table: Send + Sync {
    /// Stable table identifier used in queries
    fn name(&self) -> &'static str;

    /// Prefix applied to this table's column names when it is joined
    /// against another table
    fn name_prefix(&self) -> &'static str;

    /// The table's fixed column set
    fn columns(&self) -> &ColumnRegistry;

    /// Runs one scan: acquires the store snapshot, drives the row source,
    /// and per row applies the authorization gate, then the query's
    /// filter, then column resolution and sink emission. Stops early at
    /// the query's limit or on sink closure.
    fn answer_query(&self, query: &mut Query<'_>, identity: &Identity);

    /// Direct key→row lookup.
    ///
    /// Only meaningful where the key determines a unique row; the default
    /// rejects the call and leaves the table untouched.
    fn find_object(&self, key: &str) -> TableResult<Row> {
        let _ = key;
        Err(TableError::unsupported(self.name(), "find_object"))
    }
}
