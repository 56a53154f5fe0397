//! Session types: the record of one live connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use mudkeep_core::Dbref;

/// Counter for generating unique connection ids.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one transport-level connection.
///
/// A player keeps the same dbref forever, but every bind gets a fresh
/// `ConnectionId` — so an eviction (player connects from a second
/// client) is distinguishable from the original session even though
/// both belong to the same dbref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    /// Allocates the next connection id. Never reused within a process.
    pub(crate) fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// One live session: the binding between a connected endpoint and
/// exactly one dbref.
///
/// A session exists only while connected. Disconnecting removes it from
/// the manager; there is no half-dead state to reason about. The state
/// machine `Disconnected → Connected → Disconnected` is therefore
/// expressed by presence in the manager's table.
#[derive(Debug, Clone)]
pub struct Session {
    /// The player this session belongs to.
    pub dbref: Dbref,

    /// The transport connection currently bound to the player.
    pub connection: ConnectionId,

    /// When the binding was established.
    pub connected_at: Instant,
}

impl Session {
    pub(crate) fn new(dbref: Dbref) -> Self {
        Self {
            dbref,
            connection: ConnectionId::next(),
            connected_at: Instant::now(),
        }
    }
}
