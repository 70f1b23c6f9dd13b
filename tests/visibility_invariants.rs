//! Authorization gate invariant tests
//!
//! Visibility is enforced per row, before filter evaluation and before
//! any column resolution:
//! - a rejected host never appears in output, whatever the filter says
//! - rejected rows never count toward a limit
//! - join rows gate on the primary (host) side only

use std::sync::Arc;

use livequery::auth::Identity;
use livequery::filter::FilterNode;
use livequery::query::{Query, QuerySpec, ResolvedRow, VecSink};
use livequery::store::LiveStore;
use livequery::table::{HostsByGroupTable, HostsTable, Table};

// =============================================================================
// Helpers
// =============================================================================

/// h1 in {g1, g2}, h2 in {}, h3 in {g1}; contact "ops" sees h1 and h2
/// but not h3.
fn scenario_store() -> Arc<LiveStore> {
    let store = Arc::new(LiveStore::new());
    let h1 = store.add_host("h1", "first", "10.0.0.1");
    let h2 = store.add_host("h2", "second", "10.0.0.2");
    let h3 = store.add_host("h3", "third", "10.0.0.3");
    let g1 = store.add_group("g1", "group one");
    let g2 = store.add_group("g2", "group two");
    store.add_member(g1, h1);
    store.add_member(g2, h1);
    store.add_member(g1, h3);
    store.add_contact(h1, "ops");
    store.add_contact(h2, "ops");
    store
}

fn run(table: &dyn Table, spec: QuerySpec, identity: &Identity) -> Vec<ResolvedRow> {
    let mut sink = VecSink::new();
    let mut query = Query::new(spec, table.columns(), &mut sink).unwrap();
    table.answer_query(&mut query, identity);
    sink.into_rows()
}

fn edge_pairs(rows: &[ResolvedRow]) -> Vec<(String, String)> {
    rows.iter()
        .map(|row| {
            let get = |name: &str| {
                row.values
                    .iter()
                    .find(|(n, _)| n == name)
                    .and_then(|(_, v)| v.as_str())
                    .unwrap_or("<absent>")
                    .to_string()
            };
            (get("name"), get("hostgroup_name"))
        })
        .collect()
}

fn edges_spec() -> QuerySpec {
    QuerySpec::new().with_columns(["name", "hostgroup_name"])
}

// =============================================================================
// Row suppression
// =============================================================================

/// An identity without visibility on h3 never receives an h3 edge.
#[test]
fn test_invisible_host_rows_are_suppressed() {
    let table = HostsByGroupTable::new(scenario_store());
    let rows = run(&table, edges_spec(), &Identity::contact("ops"));

    assert_eq!(
        edge_pairs(&rows),
        vec![("h1".into(), "g1".into()), ("h1".into(), "g2".into())]
    );
}

/// Suppression holds even when the filter explicitly matches the
/// invisible host.
#[test]
fn test_filter_cannot_reveal_invisible_host() {
    let table = HostsByGroupTable::new(scenario_store());
    let spec = edges_spec().with_filter(FilterNode::eq("name", "h3"));
    let rows = run(&table, spec, &Identity::contact("ops"));

    assert!(rows.is_empty());
}

/// The same gate applies on the simple hosts table.
#[test]
fn test_gate_applies_uniformly_across_tables() {
    let table = HostsTable::new(scenario_store());
    let spec = QuerySpec::new().with_columns(["name"]);
    let rows = run(&table, spec, &Identity::contact("ops"));

    let names: Vec<_> = rows
        .iter()
        .filter_map(|r| r.values[0].1.as_str().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["h1", "h2"]);
}

// =============================================================================
// Interaction with limits
// =============================================================================

/// Rejected rows never count toward the limit: an invisible edge scanned
/// first must not consume one of the two limit slots.
#[test]
fn test_rejected_rows_do_not_consume_limit() {
    let store = Arc::new(LiveStore::new());
    let hidden = store.add_host("hidden", "", "10.0.0.9");
    let seen = store.add_host("seen", "", "10.0.0.10");
    let g1 = store.add_group("g1", "");
    let g2 = store.add_group("g2", "");
    store.add_member(g1, hidden);
    store.add_member(g1, seen);
    store.add_member(g2, seen);
    store.add_contact(seen, "ops");

    let table = HostsByGroupTable::new(store);
    let rows = run(&table, edges_spec().with_limit(2), &Identity::contact("ops"));
    assert_eq!(
        edge_pairs(&rows),
        vec![("seen".into(), "g1".into()), ("seen".into(), "g2".into())]
    );
}

// =============================================================================
// Join gating policy
// =============================================================================

/// hostsbygroup gates on the host side only: a visible host's edges are
/// emitted regardless of any notion of group visibility.
#[test]
fn test_join_rows_gate_on_primary_side_only() {
    let table = HostsByGroupTable::new(scenario_store());
    let rows = run(&table, edges_spec(), &Identity::contact("ops"));

    // Both of h1's groups appear, g2 included
    let groups: Vec<_> = edge_pairs(&rows).into_iter().map(|(_, g)| g).collect();
    assert_eq!(groups, vec!["g1", "g2"]);
}

/// An unrestricted identity sees every edge.
#[test]
fn test_unrestricted_identity_sees_all_edges() {
    let table = HostsByGroupTable::new(scenario_store());
    let rows = run(&table, edges_spec(), &Identity::unrestricted());
    assert_eq!(rows.len(), 3);
}
