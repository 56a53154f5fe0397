//! Error types for the database layer.

use mudkeep_core::Dbref;

/// Errors that can occur in the object table and player directory.
///
/// `InvalidRef` and `CapacityExceeded` are structural — they indicate
/// caller misuse or resource exhaustion. `NotFound` and `NameConflict`
/// are normal outcomes of the name index and are converted to sentinel
/// returns at the external boundary.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The dbref was never allocated, or its object has been tombstoned.
    #[error("invalid reference {0}")]
    InvalidRef(Dbref),

    /// The name has no mapping in the player directory.
    #[error("no player named {0:?}")]
    NotFound(String),

    /// The name is already registered to a different live player.
    #[error("player name {0:?} is already in use")]
    NameConflict(String),

    /// The object table has reached its configured maximum size.
    #[error("object table is full ({0} objects)")]
    CapacityExceeded(usize),

    /// Password hashing failed. Should not happen with a well-formed
    /// salt; surfaced rather than swallowed so misconfiguration is loud.
    #[error("credential hashing failed: {0}")]
    Credential(String),
}
