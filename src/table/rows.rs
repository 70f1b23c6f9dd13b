//! Row sources
//!
//! A row source is a forward-only, finite iterator of [`Row`]s, built
//! fresh for every `answer_query` call against the snapshot that call
//! holds. Nothing is materialized up front.

use crate::store::StatusStore;

use super::Row;

/// One row per host, in canonical store order.
pub(crate) fn host_rows(store: &StatusStore) -> impl Iterator<Item = Row> + '_ {
    store.host_ids().map(Row::host_row)
}

/// The many-to-many fan-out: one row per (host, group) membership edge.
///
/// Walks hosts in canonical order and each host's membership list in
/// configuration order, so the sequence is deterministic for a fixed
/// snapshot. Only actual edges are enumerated; cost is O(edges), never
/// O(hosts × groups). A host with no memberships contributes no rows —
/// callers that need every host at least once query `hosts` instead.
pub(crate) fn host_group_edge_rows(store: &StatusStore) -> impl Iterator<Item = Row> + '_ {
    store.host_ids().flat_map(move |host_id| {
        store.host(host_id).into_iter().flat_map(move |host| {
            host.groups
                .iter()
                .map(move |group_id| Row::edge(host_id, *group_id))
        })
    })
}
