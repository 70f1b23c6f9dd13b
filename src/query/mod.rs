//! Query construction and scan orchestration
//!
//! A [`QuerySpec`] carries what the protocol layer parsed: requested
//! columns, a filter tree, an optional limit. [`Query::new`] validates the
//! spec against the target table's column registry — every construction
//! error surfaces here, before any row is scanned. After construction the
//! column list and filter are immutable; only the emitted-row counter
//! changes during a scan.
//!
//! Per-row order inside the scan is fixed: authorization gate, then
//! filter, then column resolution, then sink emission. A row rejected by
//! the gate or the filter never counts toward the limit.

mod errors;

pub use errors::{QueryError, QueryResult};

use serde::Serialize;
use uuid::Uuid;

use crate::auth::{self, Identity};
use crate::column::ColumnRegistry;
use crate::filter::{CompiledFilter, FilterNode};
use crate::observability::Logger;
use crate::store::StatusStore;
use crate::table::Row;
use crate::value::Value;

/// What the sink reports after accepting a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// The sink can take more rows
    Ready,
    /// The sink cannot take more rows (client gone, backpressure); the
    /// scan stops at the next row boundary. Not an error.
    Closed,
}

/// One emitted row: resolved values in requested-column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRow {
    pub values: Vec<(String, Value)>,
}

/// Where surviving rows go. The sink owns any blocking or backpressure
/// toward the client; the core treats emission as synchronous.
pub trait RowSink {
    /// Consumes one row and reports whether more can follow.
    fn emit(&mut self, row: ResolvedRow) -> SinkStatus;
}

/// A sink that collects rows in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct VecSink {
    rows: Vec<ResolvedRow>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ResolvedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ResolvedRow> {
        self.rows
    }
}

impl RowSink for VecSink {
    fn emit(&mut self, row: ResolvedRow) -> SinkStatus {
        self.rows.push(row);
        SinkStatus::Ready
    }
}

/// The parsed request, before validation against a table.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    /// Requested output columns; empty means every registered column in
    /// registration order
    pub columns: Vec<String>,
    /// Filter tree; `None` matches every row
    pub filter: Option<FilterNode>,
    /// Maximum rows to emit, counting only rows that pass both gates
    pub limit: Option<usize>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A validated query bound to one table's column registry, run once.
///
/// Borrows its sink for the lifetime of the request; the protocol layer
/// keeps the sink and reads it back after the scan.
pub struct Query<'s> {
    id: Uuid,
    column_names: Vec<String>,
    column_indices: Vec<usize>,
    filter: Option<CompiledFilter>,
    limit: Option<usize>,
    emitted: usize,
    sink: &'s mut dyn RowSink,
}

impl std::fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("id", &self.id)
            .field("column_names", &self.column_names)
            .field("column_indices", &self.column_indices)
            .field("filter", &self.filter)
            .field("limit", &self.limit)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl<'s> Query<'s> {
    /// Validates `spec` against `columns` and binds the sink.
    ///
    /// Fails with [`QueryError::InvalidColumn`] for any unregistered
    /// requested column and with [`QueryError::Filter`] for a filter that
    /// does not compile. Either way no row is ever scanned.
    pub fn new(
        spec: QuerySpec,
        columns: &ColumnRegistry,
        sink: &'s mut dyn RowSink,
    ) -> QueryResult<Self> {
        let column_names: Vec<String> = if spec.columns.is_empty() {
            columns.names().map(str::to_string).collect()
        } else {
            spec.columns
        };

        let mut column_indices = Vec::with_capacity(column_names.len());
        for name in &column_names {
            let index = columns.index_of(name).map_err(|_| {
                Self::log_rejection("invalid column", name);
                QueryError::InvalidColumn {
                    column: name.clone(),
                }
            })?;
            column_indices.push(index);
        }

        let filter = spec
            .filter
            .map(|node| node.compile(columns))
            .transpose()
            .map_err(|err| {
                Self::log_rejection("filter", &err.to_string());
                err
            })?;

        Ok(Self {
            id: Uuid::new_v4(),
            column_names,
            column_indices,
            filter,
            limit: spec.limit,
            emitted: 0,
            sink,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Rows emitted so far (final count after the scan)
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Requested column names, in output order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Drives one scan for a table. The table passes its own registry and
    /// a fresh row source built against the snapshot it holds.
    pub(crate) fn scan(
        &mut self,
        table: &'static str,
        columns: &ColumnRegistry,
        identity: &Identity,
        store: &StatusStore,
        rows: impl Iterator<Item = Row>,
    ) {
        let mut scanned: usize = 0;
        for row in rows {
            if self.limit_reached() {
                break;
            }
            scanned += 1;

            // Gate before filter and before column resolution: an
            // invisible host's columns are never even resolved.
            let host = match row.host.and_then(|id| store.host(id)) {
                Some(host) => host,
                None => continue,
            };
            if !auth::is_visible(identity, host) {
                continue;
            }

            if let Some(filter) = &self.filter {
                if !filter.evaluate(columns, &row, store) {
                    continue;
                }
            }

            let resolved = self.resolve_row(columns, &row, store);
            self.emitted += 1;
            if self.sink.emit(resolved) == SinkStatus::Closed {
                // Normal early termination, worth a trace for operators
                let query_id = self.id.to_string();
                Logger::warn(
                    "SINK_CLOSED",
                    &[("table", table), ("query_id", &query_id)],
                );
                break;
            }
        }

        let query_id = self.id.to_string();
        let emitted = self.emitted.to_string();
        let scanned = scanned.to_string();
        Logger::info(
            "QUERY_COMPLETED",
            &[
                ("table", table),
                ("query_id", &query_id),
                ("rows_emitted", &emitted),
                ("rows_scanned", &scanned),
            ],
        );
    }

    fn log_rejection(kind: &str, detail: &str) {
        Logger::error("QUERY_REJECTED", &[("kind", kind), ("detail", detail)]);
    }

    fn limit_reached(&self) -> bool {
        self.limit.map_or(false, |limit| self.emitted >= limit)
    }

    fn resolve_row(&self, columns: &ColumnRegistry, row: &Row, store: &StatusStore) -> ResolvedRow {
        let values = self
            .column_names
            .iter()
            .zip(&self.column_indices)
            .map(|(name, index)| (name.clone(), columns.get(*index).resolve(row, store)))
            .collect();
        ResolvedRow { values }
    }
}
