//! Live object store for livequery
//!
//! Holds the monitoring engine's current-state object graph: hosts, host
//! groups, and the many-to-many membership relation between them. The query
//! core never copies or mutates these objects; rows carry handles
//! (`HostId`/`GroupId`) that index into the store's arenas, so a handle that
//! outlives its entity is a checkable absence rather than a dangling
//! reference.
//!
//! Concurrency contract:
//! - The engine's update thread mutates through [`LiveStore`]'s write path.
//! - One query scan holds [`LiveStore::snapshot`]'s read guard for exactly
//!   one `answer_query` call, so all rows of one scan observe a single
//!   point-in-time view. The guard must never be held across queries or
//!   protocol I/O.
//! - Membership is kept symmetric: linking a host into a group updates both
//!   the host's group list and the group's member list.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};

/// Handle to a host in the store's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(pub(crate) u32);

/// Handle to a host group in the store's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) u32);

/// A monitored host, owned by the store
#[derive(Debug, Clone)]
pub struct Host {
    pub name: String,
    pub alias: String,
    pub address: String,
    /// Current hard state (0 = up, 1 = down, 2 = unreachable)
    pub state: i64,
    /// Contacts allowed to see this host
    pub contacts: Vec<String>,
    /// Membership edges, in configuration order
    pub groups: Vec<GroupId>,
    pub last_state_change: DateTime<Utc>,
}

/// A named group of hosts
#[derive(Debug, Clone)]
pub struct HostGroup {
    pub name: String,
    pub alias: String,
    /// Membership edges, in configuration order
    pub members: Vec<HostId>,
}

/// The current-state object graph behind the lock.
///
/// Arena order is canonical iteration order: hosts and groups are scanned
/// in the order the engine registered them, which keeps row emission
/// deterministic for an unchanged snapshot.
#[derive(Debug, Default)]
pub struct StatusStore {
    hosts: Vec<Host>,
    groups: Vec<HostGroup>,
    host_names: HashMap<String, HostId>,
    group_names: HashMap<String, GroupId>,
}

impl StatusStore {
    /// Resolves a host handle; `None` if it does not index a live host
    pub fn host(&self, id: HostId) -> Option<&Host> {
        self.hosts.get(id.0 as usize)
    }

    /// Resolves a group handle; `None` if it does not index a live group
    pub fn group(&self, id: GroupId) -> Option<&HostGroup> {
        self.groups.get(id.0 as usize)
    }

    /// All host handles in canonical order
    pub fn host_ids(&self) -> impl Iterator<Item = HostId> + '_ {
        (0..self.hosts.len() as u32).map(HostId)
    }

    /// All group handles in canonical order
    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        (0..self.groups.len() as u32).map(GroupId)
    }

    /// O(1) host lookup by unique name
    pub fn host_by_name(&self, name: &str) -> Option<HostId> {
        self.host_names.get(name).copied()
    }

    /// O(1) group lookup by unique name
    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.group_names.get(name).copied()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// One consistent point-in-time view of the store.
///
/// Wraps the read guard; dropping it releases the lock. Scoped to exactly
/// one query scan.
pub struct StoreSnapshot<'a> {
    guard: RwLockReadGuard<'a, StatusStore>,
}

impl Deref for StoreSnapshot<'_> {
    type Target = StatusStore;

    fn deref(&self) -> &StatusStore {
        &self.guard
    }
}

/// The shared, lock-protected store handed to tables and the update thread.
#[derive(Debug, Default)]
pub struct LiveStore {
    inner: RwLock<StatusStore>,
}

impl LiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the read side for the duration of one query scan.
    ///
    /// A poisoned lock yields the last consistent state; the store contains
    /// no invariants a reader could observe half-applied, since every write
    /// method below leaves both sides of the membership relation in sync.
    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        StoreSnapshot {
            guard: self.inner.read().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StatusStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a host with no memberships yet. Arena order is
    /// registration order.
    pub fn add_host(&self, name: &str, alias: &str, address: &str) -> HostId {
        let mut store = self.write();
        let id = HostId(store.hosts.len() as u32);
        store.hosts.push(Host {
            name: name.to_string(),
            alias: alias.to_string(),
            address: address.to_string(),
            state: 0,
            contacts: Vec::new(),
            groups: Vec::new(),
            last_state_change: Utc::now(),
        });
        store.host_names.insert(name.to_string(), id);
        id
    }

    /// Registers an empty host group
    pub fn add_group(&self, name: &str, alias: &str) -> GroupId {
        let mut store = self.write();
        let id = GroupId(store.groups.len() as u32);
        store.groups.push(HostGroup {
            name: name.to_string(),
            alias: alias.to_string(),
            members: Vec::new(),
        });
        store.group_names.insert(name.to_string(), id);
        id
    }

    /// Links a host into a group, updating both sides of the relation.
    /// Duplicate links are ignored.
    pub fn add_member(&self, group: GroupId, host: HostId) {
        let mut store = self.write();
        let valid = store.host(host).is_some() && store.group(group).is_some();
        if !valid {
            return;
        }
        if !store.hosts[host.0 as usize].groups.contains(&group) {
            store.hosts[host.0 as usize].groups.push(group);
        }
        if !store.groups[group.0 as usize].members.contains(&host) {
            store.groups[group.0 as usize].members.push(host);
        }
    }

    /// Records a hard state change for a host
    pub fn set_host_state(&self, host: HostId, state: i64, when: DateTime<Utc>) {
        let mut store = self.write();
        if let Some(h) = store.hosts.get_mut(host.0 as usize) {
            h.state = state;
            h.last_state_change = when;
        }
    }

    /// Grants a contact visibility on a host
    pub fn add_contact(&self, host: HostId, contact: &str) {
        let mut store = self.write();
        if let Some(h) = store.hosts.get_mut(host.0 as usize) {
            if !h.contacts.iter().any(|c| c == contact) {
                h.contacts.push(contact.to_string());
            }
        }
    }
}
