//! Error types for the session layer.

use mudkeep_core::Dbref;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The player has no live session.
    /// Returned when releasing a dbref that was never bound (or whose
    /// session was already torn down).
    #[error("player {0} is not connected")]
    NotConnected(Dbref),

    /// The manager has performed its emergency shutdown sweep.
    /// New sessions are refused from that point on; the binding that
    /// raced the shutdown loses.
    #[error("session manager is shutting down")]
    ShuttingDown,
}
