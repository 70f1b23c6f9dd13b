//! Join fan-out invariant tests
//!
//! The `hostsbygroup` table denormalizes the host↔group membership
//! relation into one row per actual edge:
//! - exactly |M(host)| rows per host, zero for hosts with no memberships
//! - deterministic row order: host order × membership order
//! - filters may reference either side of the join

use std::sync::Arc;

use livequery::auth::Identity;
use livequery::filter::FilterNode;
use livequery::query::{Query, QuerySpec, ResolvedRow, VecSink};
use livequery::store::LiveStore;
use livequery::table::{HostsByGroupTable, Table};
use livequery::value::Value;

// =============================================================================
// Helpers
// =============================================================================

/// The reference scenario: h1 in {g1, g2}, h2 in {}, h3 in {g1}.
fn scenario_store() -> Arc<LiveStore> {
    let store = Arc::new(LiveStore::new());
    let h1 = store.add_host("h1", "first", "10.0.0.1");
    store.add_host("h2", "second", "10.0.0.2");
    let h3 = store.add_host("h3", "third", "10.0.0.3");
    let g1 = store.add_group("g1", "group one");
    let g2 = store.add_group("g2", "group two");
    store.add_member(g1, h1);
    store.add_member(g2, h1);
    store.add_member(g1, h3);
    store
}

fn run(table: &dyn Table, spec: QuerySpec, identity: &Identity) -> Vec<ResolvedRow> {
    let mut sink = VecSink::new();
    let mut query = Query::new(spec, table.columns(), &mut sink).unwrap();
    table.answer_query(&mut query, identity);
    sink.into_rows()
}

/// Extracts one string column from every row, in emission order.
fn column_values(rows: &[ResolvedRow], name: &str) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.values
                .iter()
                .find(|(n, _)| n == name)
                .and_then(|(_, v)| v.as_str())
                .unwrap_or("<absent>")
                .to_string()
        })
        .collect()
}

fn edge_pairs(rows: &[ResolvedRow]) -> Vec<(String, String)> {
    column_values(rows, "name")
        .into_iter()
        .zip(column_values(rows, "hostgroup_name"))
        .collect()
}

fn edges_spec() -> QuerySpec {
    QuerySpec::new().with_columns(["name", "hostgroup_name"])
}

// =============================================================================
// Fan-out shape
// =============================================================================

/// One row per membership edge, in host order × membership order.
#[test]
fn test_unfiltered_scan_yields_every_edge_in_order() {
    let table = HostsByGroupTable::new(scenario_store());
    let rows = run(&table, edges_spec(), &Identity::unrestricted());

    assert_eq!(
        edge_pairs(&rows),
        vec![
            ("h1".into(), "g1".into()),
            ("h1".into(), "g2".into()),
            ("h3".into(), "g1".into()),
        ]
    );
}

/// A host with no memberships never appears in the join table.
#[test]
fn test_memberless_host_yields_zero_rows() {
    let table = HostsByGroupTable::new(scenario_store());
    let rows = run(&table, edges_spec(), &Identity::unrestricted());

    assert!(!column_values(&rows, "name").contains(&"h2".to_string()));
}

/// Row count per host equals that host's membership count.
#[test]
fn test_row_count_per_host_matches_membership_count() {
    let table = HostsByGroupTable::new(scenario_store());
    let rows = run(&table, edges_spec(), &Identity::unrestricted());

    let hosts = column_values(&rows, "name");
    assert_eq!(hosts.iter().filter(|h| *h == "h1").count(), 2);
    assert_eq!(hosts.iter().filter(|h| *h == "h2").count(), 0);
    assert_eq!(hosts.iter().filter(|h| *h == "h3").count(), 1);
}

// =============================================================================
// Determinism
// =============================================================================

/// Re-running the same query against an unchanged snapshot yields
/// identical output.
#[test]
fn test_repeated_scan_is_deterministic() {
    let table = HostsByGroupTable::new(scenario_store());

    let first = run(&table, edges_spec(), &Identity::unrestricted());
    let second = run(&table, edges_spec(), &Identity::unrestricted());
    assert_eq!(first, second);
}

// =============================================================================
// Filters across the join
// =============================================================================

/// Filtering on the group side prunes edges, not hosts.
#[test]
fn test_filter_on_group_side() {
    let table = HostsByGroupTable::new(scenario_store());
    let spec = edges_spec().with_filter(FilterNode::eq("hostgroup_name", "g1"));
    let rows = run(&table, spec, &Identity::unrestricted());

    assert_eq!(
        edge_pairs(&rows),
        vec![("h1".into(), "g1".into()), ("h3".into(), "g1".into())]
    );
}

/// One filter tree may reference both sides of the join row.
#[test]
fn test_filter_spanning_both_sides() {
    let table = HostsByGroupTable::new(scenario_store());
    let spec = edges_spec().with_filter(FilterNode::and(vec![
        FilterNode::eq("name", "h1"),
        FilterNode::eq("hostgroup_name", "g2"),
    ]));
    let rows = run(&table, spec, &Identity::unrestricted());

    assert_eq!(edge_pairs(&rows), vec![("h1".into(), "g2".into())]);
}

/// Group-side columns resolve against the edge's group, host-side columns
/// against the edge's host.
#[test]
fn test_both_sides_resolve_per_edge() {
    let table = HostsByGroupTable::new(scenario_store());
    let spec = QuerySpec::new().with_columns(["name", "hostgroup_name", "hostgroup_num_hosts"]);
    let rows = run(&table, spec, &Identity::unrestricted());

    // g1 has two members, g2 has one
    let num_hosts: Vec<Value> = rows
        .iter()
        .map(|row| row.values[2].1.clone())
        .collect();
    assert_eq!(
        num_hosts,
        vec![Value::Int(2), Value::Int(1), Value::Int(2)]
    );
}
