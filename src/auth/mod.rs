//! Per-row authorization for livequery
//!
//! The query core consumes an [`Identity`] as an opaque capability; it is
//! produced by the connection layer and never inspected beyond the
//! visibility check. One shared gate function keyed on
//! (identity, primary entity) is used by every table, so the policy cannot
//! drift between table variants.
//!
//! The gate runs before filter evaluation and before column resolution:
//! an invisible host never has its columns resolved, never matches a
//! filter, and never counts toward a query limit. That keeps host
//! existence from leaking through row counts or filter behavior.

use crate::store::Host;

/// The authenticated requester, as handed over by the connection layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    kind: IdentityKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IdentityKind {
    /// The engine itself or an administrative session; sees everything
    Unrestricted,
    /// A named contact; sees only hosts it is a contact for
    Contact(String),
}

impl Identity {
    /// An identity that passes every visibility check
    pub fn unrestricted() -> Self {
        Self {
            kind: IdentityKind::Unrestricted,
        }
    }

    /// An identity restricted to hosts listing `name` as a contact
    pub fn contact(name: impl Into<String>) -> Self {
        Self {
            kind: IdentityKind::Contact(name.into()),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self.kind, IdentityKind::Unrestricted)
    }
}

/// The authorization gate: may `identity` see `host`?
///
/// Join tables gate on their primary entity only; whether the related
/// entity also gates the row is a per-table decision documented on the
/// table itself.
pub fn is_visible(identity: &Identity, host: &Host) -> bool {
    match &identity.kind {
        IdentityKind::Unrestricted => true,
        IdentityKind::Contact(name) => host.contacts.iter().any(|c| c == name),
    }
}
