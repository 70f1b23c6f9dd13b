//! livequery - read-only query core over a live monitoring object graph
//!
//! A monitoring engine keeps hosts, host groups, and their membership
//! relation in memory and mutates them continuously. This crate answers
//! table-scoped queries against that graph: requested columns, a filter
//! predicate tree, an optional row limit, per-row authorization. Rows
//! reflect live state under one consistent snapshot per scan; nothing is
//! persisted and nothing is written back.
//!
//! The centerpiece is the join table `hostsbygroup`, which denormalizes
//! the many-to-many host↔group relation into one row per membership edge
//! without ever materializing a cross-product.
//!
//! ```
//! use std::sync::Arc;
//! use livequery::auth::Identity;
//! use livequery::filter::FilterNode;
//! use livequery::query::{Query, QuerySpec, VecSink};
//! use livequery::store::LiveStore;
//! use livequery::table::{HostsByGroupTable, Table};
//!
//! let store = Arc::new(LiveStore::new());
//! let h1 = store.add_host("web01", "Web frontend", "10.0.0.1");
//! let g1 = store.add_group("web", "Web servers");
//! store.add_member(g1, h1);
//!
//! let table = HostsByGroupTable::new(store);
//! let spec = QuerySpec::new()
//!     .with_columns(["name", "hostgroup_name"])
//!     .with_filter(FilterNode::eq("hostgroup_name", "web"));
//!
//! let mut sink = VecSink::new();
//! let mut query = Query::new(spec, table.columns(), &mut sink).unwrap();
//! table.answer_query(&mut query, &Identity::unrestricted());
//! assert_eq!(sink.rows().len(), 1);
//! ```

pub mod auth;
pub mod column;
pub mod filter;
pub mod observability;
pub mod query;
pub mod store;
pub mod table;
pub mod value;

pub use auth::Identity;
pub use column::{ColumnError, ColumnRegistry};
pub use filter::{CompareOp, FilterError, FilterNode};
pub use query::{Query, QueryError, QuerySpec, ResolvedRow, RowSink, SinkStatus, VecSink};
pub use store::LiveStore;
pub use table::{HostsByGroupTable, HostsTable, Row, Table, TableError};
pub use value::{Value, ValueType};
