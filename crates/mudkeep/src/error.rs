//! Unified error type for the Mudkeep facade.

use mudkeep_db::DbError;
use mudkeep_session::SessionError;

/// Top-level error that wraps the layer-specific errors.
///
/// Callers of the typed API deal with this single type; the `#[from]`
/// variants let `?` convert layer errors automatically. The sentinel
/// boundary methods on [`World`](crate::World) flatten the lookup-style
/// failures into `Dbref::NOTHING` instead.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A database-layer error (invalid ref, name conflict, capacity).
    #[error(transparent)]
    Db(#[from] DbError),

    /// A session-layer error (not connected, shutting down).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Credential failure. Deliberately carries no detail: an unknown
    /// name and a wrong password are indistinguishable, so the error
    /// cannot be used to enumerate player names.
    #[error("authentication failed")]
    AuthFailed,

    /// The proposed player name is not acceptable (empty, reserved,
    /// or contains forbidden characters).
    #[error("invalid player name {0:?}")]
    InvalidName(String),
}
