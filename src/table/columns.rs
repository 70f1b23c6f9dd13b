//! Shared column sets
//!
//! Host-side and group-side column registrations are shared between the
//! plain `hosts` table and every join table that carries a host or group
//! component, so column names and semantics cannot drift between tables.
//! The prefix argument implements name disambiguation when two entity
//! kinds meet in one row.

use crate::column::{Accessor, ColumnRegistry};
use crate::store::{Host, HostGroup, StatusStore};
use crate::value::{Value, ValueType};

/// Lifts a pure host projection into an accessor that reads the row's
/// host side, yielding Absent when the handle does not resolve.
fn host_col<F>(f: F) -> Accessor
where
    F: Fn(&Host, &StatusStore) -> Value + Send + Sync + 'static,
{
    Box::new(move |row, store| {
        row.host
            .and_then(|id| store.host(id))
            .map_or(Value::Absent, |host| f(host, store))
    })
}

/// Group-side counterpart of [`host_col`].
fn group_col<F>(f: F) -> Accessor
where
    F: Fn(&HostGroup, &StatusStore) -> Value + Send + Sync + 'static,
{
    Box::new(move |row, store| {
        row.group
            .and_then(|id| store.group(id))
            .map_or(Value::Absent, |group| f(group, store))
    })
}

/// Registers the host column set under `prefix`.
pub(crate) fn register_host_columns(reg: &mut ColumnRegistry, prefix: &str) {
    reg.register(
        format!("{prefix}name"),
        ValueType::Str,
        host_col(|h, _| Value::Str(h.name.clone())),
    );
    reg.register(
        format!("{prefix}alias"),
        ValueType::Str,
        host_col(|h, _| Value::Str(h.alias.clone())),
    );
    reg.register(
        format!("{prefix}address"),
        ValueType::Str,
        host_col(|h, _| Value::Str(h.address.clone())),
    );
    reg.register(
        format!("{prefix}state"),
        ValueType::Int,
        host_col(|h, _| Value::Int(h.state)),
    );
    reg.register(
        format!("{prefix}contacts"),
        ValueType::StrList,
        host_col(|h, _| Value::StrList(h.contacts.clone())),
    );
    reg.register(
        format!("{prefix}groups"),
        ValueType::StrList,
        host_col(|h, store| {
            Value::StrList(
                h.groups
                    .iter()
                    .filter_map(|id| store.group(*id).map(|g| g.name.clone()))
                    .collect(),
            )
        }),
    );
    reg.register(
        format!("{prefix}num_groups"),
        ValueType::Int,
        host_col(|h, _| Value::Int(h.groups.len() as i64)),
    );
    reg.register(
        format!("{prefix}last_state_change"),
        ValueType::Time,
        host_col(|h, _| Value::Time(h.last_state_change)),
    );
}

/// Registers the host group column set under `prefix`.
pub(crate) fn register_group_columns(reg: &mut ColumnRegistry, prefix: &str) {
    reg.register(
        format!("{prefix}name"),
        ValueType::Str,
        group_col(|g, _| Value::Str(g.name.clone())),
    );
    reg.register(
        format!("{prefix}alias"),
        ValueType::Str,
        group_col(|g, _| Value::Str(g.alias.clone())),
    );
    reg.register(
        format!("{prefix}members"),
        ValueType::StrList,
        group_col(|g, store| {
            Value::StrList(
                g.members
                    .iter()
                    .filter_map(|id| store.host(*id).map(|h| h.name.clone()))
                    .collect(),
            )
        }),
    );
    reg.register(
        format!("{prefix}num_hosts"),
        ValueType::Int,
        group_col(|g, _| Value::Int(g.members.len() as i64)),
    );
}
