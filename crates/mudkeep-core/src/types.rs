//! Identity types: `Dbref` and `ObjectKind`.
//!
//! These are the "nouns" the whole system speaks in. Everything else —
//! records, sessions, index entries — is keyed by a `Dbref`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Dbref
// ---------------------------------------------------------------------------

/// A stable integer reference to one database object.
///
/// This is a newtype wrapper over `i64`. The wrapper buys two things:
///
/// 1. **Type safety**: a `Dbref` can't be confused with some other
///    integer (a count, an index into an unrelated table).
/// 2. **The sentinel convention**: the external boundary of this system
///    returns an integer rather than raising on lookup miss, so the
///    "no such object" value is part of the type's vocabulary, not an
///    ad-hoc magic number at each call site.
///
/// A non-negative dbref identifies exactly one object for that object's
/// entire lifetime. Dbrefs are never reused: destroying an object
/// tombstones its slot, it does not free the number.
///
/// `#[serde(transparent)]` makes a `Dbref(5)` serialize as plain `5`,
/// which is what any dump format or wire consumer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dbref(pub i64);

impl Dbref {
    /// The reserved "no such object" sentinel (-1).
    ///
    /// Returned by boundary lookup operations instead of an error, so
    /// callers can branch on the value rather than catching anything.
    pub const NOTHING: Dbref = Dbref(-1);

    /// Returns `true` if this dbref could name a live object
    /// (i.e. it is not the sentinel and not otherwise negative).
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// Returns `true` if this is the "no such object" sentinel.
    pub fn is_nothing(self) -> bool {
        self == Self::NOTHING
    }
}

impl fmt::Display for Dbref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The traditional MUD spelling: "#5", "#-1".
        write!(f, "#{}", self.0)
    }
}

impl From<Dbref> for i64 {
    fn from(dbref: Dbref) -> i64 {
        dbref.0
    }
}

impl From<i64> for Dbref {
    fn from(raw: i64) -> Dbref {
        Dbref(raw)
    }
}

// ---------------------------------------------------------------------------
// ObjectKind
// ---------------------------------------------------------------------------

/// The type tag of a database object.
///
/// Every object is exactly one of these for its whole life; the kind
/// decides which payload its record carries (players hold a credential
/// and connection status, the rest are plain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A player character; the only kind that can authenticate and
    /// hold a session.
    Player,
    /// A location players can occupy.
    Room,
    /// A link between rooms.
    Exit,
    /// Any other carryable/placeable object.
    Thing,
}

impl ObjectKind {
    /// Returns `true` for objects that can own a credential and connect.
    pub fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Room => write!(f, "room"),
            Self::Exit => write!(f, "exit"),
            Self::Thing => write!(f, "thing"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
