//! The `World` service object and its sentinel-convention boundary.
//!
//! A `World` is constructed explicitly at server start (no globals),
//! shared behind an `Arc`, and torn down with `emergency_shutdown`.
//! The session manager sits behind one async mutex; the object table
//! and directory do their own finer-grained locking internally.

use mudkeep_core::Dbref;
use mudkeep_db::{ObjectRecord, ObjectTable, PlayerDirectory, TableConfig};
use mudkeep_session::{Notifier, SessionManager};
use tokio::sync::Mutex;

use crate::WorldError;

/// Builder for configuring a [`World`].
///
/// This is the construction entry point. The notifier goes to
/// [`build`](WorldBuilder::build) rather than to the builder itself, so
/// the world's type parameter is inferred from the one place it
/// matters.
///
/// # Example
///
/// ```rust,no_run
/// use mudkeep::prelude::*;
///
/// let world = WorldBuilder::new()
///     .max_objects(100_000)
///     .build(NoopNotifier);
/// ```
pub struct WorldBuilder {
    table_config: TableConfig,
}

impl WorldBuilder {
    /// Creates a builder with default settings (unbounded table).
    pub fn new() -> Self {
        Self {
            table_config: TableConfig::default(),
        }
    }

    /// Caps the object table at `max` objects (tombstones included).
    pub fn max_objects(mut self, max: usize) -> Self {
        self.table_config.max_objects = Some(max);
        self
    }

    /// Builds the world around the given notifier capability.
    pub fn build<N: Notifier>(self, notifier: N) -> World<N> {
        World {
            table: ObjectTable::new(self.table_config),
            directory: PlayerDirectory::new(),
            sessions: Mutex::new(SessionManager::new(notifier)),
        }
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The player/object database and connection-lifecycle core.
///
/// Owns the three layers:
/// - the object table (exclusive owner of every record),
/// - the player directory (non-owning name index),
/// - the session manager (non-owning dbref → connection bindings).
///
/// # Concurrency
///
/// All methods take `&self` and are safe under concurrent invocation.
/// The session mutex is the ordering point for connection lifecycle:
/// a bind, a release, and the shutdown sweep for any dbref are strictly
/// ordered by it, and the `connected` flag on the player's record is
/// flipped while the mutex is still held so the record never disagrees
/// with the session table. Lock order is always sessions → record,
/// never the reverse.
pub struct World<N: Notifier> {
    pub(crate) table: ObjectTable,
    pub(crate) directory: PlayerDirectory,
    pub(crate) sessions: Mutex<SessionManager<N>>,
}

impl<N: Notifier> World<N> {
    // -----------------------------------------------------------------
    // Boundary operations (integer-sentinel convention).
    //
    // These preserve the legacy contract: lookup-style failures return
    // Dbref::NOTHING so callers branch on the value instead of catching
    // anything. The typed equivalents live in players.rs.
    // -----------------------------------------------------------------

    /// Resolves a player name to a dbref.
    ///
    /// Case-insensitive. Returns [`Dbref::NOTHING`] on miss; never errors.
    pub async fn lookup_player(&self, name: &str) -> Dbref {
        self.directory.lookup(name).await.unwrap_or(Dbref::NOTHING)
    }

    /// Authenticates and connects a player, returning their dbref.
    ///
    /// Returns [`Dbref::NOTHING`] on any failure — unknown name, wrong
    /// password, or shutdown in progress — with no distinction between
    /// them. If the player is already connected the prior session is
    /// evicted (its endpoint is told first).
    pub async fn connect_player(&self, name: &str, password: &str) -> Dbref {
        let dbref = match self.authenticate(name, password).await {
            Ok(dbref) => dbref,
            Err(_) => return Dbref::NOTHING,
        };

        // Hold the session mutex across the record update so the
        // `connected` flag can never contradict the session table, and
        // so a shutdown sweep either sees this session or runs entirely
        // before it — never halfway.
        let mut sessions = self.sessions.lock().await;
        if let Err(e) = sessions.bind(dbref).await {
            tracing::info!(%dbref, error = %e, "connect refused");
            return Dbref::NOTHING;
        }
        if let Err(e) = self.set_connected(dbref, true).await {
            tracing::error!(%dbref, error = %e, "record missing for bound session");
            let _ = sessions.release(dbref);
            return Dbref::NOTHING;
        }
        dbref
    }

    /// Creates a player, returning the new dbref.
    ///
    /// Returns [`Dbref::NOTHING`] if the name is taken or invalid.
    pub async fn create_player(&self, name: &str, password: &str) -> Dbref {
        match self.register_player(name, password).await {
            Ok(dbref) => dbref,
            Err(e) => {
                tracing::debug!(name, error = %e, "create_player failed");
                Dbref::NOTHING
            }
        }
    }

    /// Delivers an out-of-band message to a connected player.
    ///
    /// Best-effort; a no-op if the player has no live session.
    pub async fn notify(&self, dbref: Dbref, message: &str) {
        self.sessions.lock().await.notify(dbref, message).await;
    }

    /// Broadcasts the emergency shutdown and forces every live session
    /// to disconnected.
    ///
    /// Always succeeds from the caller's perspective: per-session
    /// notification failures are logged and the sweep continues.
    /// Idempotent. An authentication in flight when this is called
    /// settles first (it holds the session mutex while binding); if it
    /// succeeded, its session is part of the sweep, otherwise the bind
    /// observes the latch and fails.
    pub async fn emergency_shutdown(&self) {
        let mut sessions = self.sessions.lock().await;
        let swept = sessions.emergency_shutdown().await;
        for dbref in swept {
            if let Err(e) = self.set_connected(dbref, false).await {
                tracing::warn!(%dbref, error = %e, "record missing during shutdown sweep");
            }
        }
    }

    // -----------------------------------------------------------------
    // Session lifecycle beyond the boundary table.
    // -----------------------------------------------------------------

    /// Releases `dbref`'s session (client disconnect or transport error).
    ///
    /// The object record survives; only the binding dies.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`](mudkeep_session::SessionError::NotConnected)
    /// if the player has no live session.
    pub async fn disconnect_player(&self, dbref: Dbref) -> Result<(), WorldError> {
        let mut sessions = self.sessions.lock().await;
        sessions.release(dbref)?;
        if let Err(e) = self.set_connected(dbref, false).await {
            tracing::warn!(%dbref, error = %e, "record missing on disconnect");
        }
        Ok(())
    }

    /// Returns `true` if the player currently has a live session.
    pub async fn is_connected(&self, dbref: Dbref) -> bool {
        self.sessions.lock().await.is_connected(dbref)
    }

    /// Clones out the record for `dbref`.
    ///
    /// # Errors
    /// Returns [`DbError::InvalidRef`](mudkeep_db::DbError::InvalidRef)
    /// if the dbref does not name a live object.
    pub async fn object(&self, dbref: Dbref) -> Result<ObjectRecord, WorldError> {
        Ok(self.table.get(dbref).await?)
    }

    /// Flips the `connected` mirror on a player record.
    async fn set_connected(&self, dbref: Dbref, connected: bool) -> Result<(), WorldError> {
        self.table
            .mutate(dbref, |record| {
                if let Some(data) = record.player_mut() {
                    data.connected = connected;
                }
            })
            .await?;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
