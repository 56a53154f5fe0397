//! Object records: the stored data for one database object.

use mudkeep_core::{Dbref, ObjectKind};

use crate::Credential;

// ---------------------------------------------------------------------------
// PlayerData
// ---------------------------------------------------------------------------

/// The player-specific part of a record: the password credential and
/// the current connection status.
///
/// `connected` mirrors the session manager's view so that in-world code
/// reading a record can tell whether the player is online without
/// consulting the session layer. The facade keeps the two in sync on
/// every bind/release.
#[derive(Debug, Clone)]
pub struct PlayerData {
    /// Salted hash of the player's password. Never the plaintext.
    pub credential: Credential,

    /// Whether the player currently has a live session.
    pub connected: bool,
}

impl PlayerData {
    /// Creates player data for a freshly created player (offline).
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            connected: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Kind-specific payload of an object record.
///
/// Only players carry extra state; rooms, exits, and things are inert
/// as far as this layer is concerned (their in-world behavior lives in
/// higher layers).
#[derive(Debug, Clone)]
pub enum Payload {
    /// Credential and connection status for a player.
    Player(PlayerData),

    /// No kind-specific state.
    Inert,
}

// ---------------------------------------------------------------------------
// ObjectRecord
// ---------------------------------------------------------------------------

/// The stored data for one database object.
///
/// A record is created by [`ObjectTable`](crate::ObjectTable) allocation
/// and mutated in place for its whole life; it is never moved to another
/// slot (dbref stability) and never physically removed (destruction is a
/// tombstone in the table, not a change to the record).
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    /// This object's own reference. Immutable for the object's lifetime.
    pub dbref: Dbref,

    /// Display name. Unique among players, case-insensitively; the
    /// player directory enforces that, not this struct.
    pub name: String,

    /// The type tag. Immutable for the object's lifetime.
    pub kind: ObjectKind,

    /// Non-owning back-reference to the object's owner.
    pub owner: Dbref,

    /// Kind-specific state.
    pub payload: Payload,
}

impl ObjectRecord {
    /// Returns the player payload, or `None` for non-player objects.
    pub fn player(&self) -> Option<&PlayerData> {
        match &self.payload {
            Payload::Player(data) => Some(data),
            Payload::Inert => None,
        }
    }

    /// Mutable access to the player payload.
    pub fn player_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.payload {
            Payload::Player(data) => Some(data),
            Payload::Inert => None,
        }
    }
}
