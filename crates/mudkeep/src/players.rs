//! The typed player-management operations: create, authenticate,
//! change password, rename, destroy.
//!
//! These return real `Result`s with a full error taxonomy. The
//! integer-sentinel boundary in `world.rs` is a thin mapping over them;
//! everything interesting about ordering and atomicity lives here.

use mudkeep_core::{Dbref, ObjectKind};
use mudkeep_db::{Credential, DbError, is_valid_player_name};
use mudkeep_session::Notifier;

use crate::{World, WorldError};

impl<N: Notifier> World<N> {
    /// Creates a new player with the given name and password.
    ///
    /// The record is fully formed (credential included) BEFORE the name
    /// is registered, so there is no window in which a lookup resolves
    /// to a dbref whose record is not yet readable. The directory insert
    /// is the linearization point for concurrent creates of the same
    /// name: exactly one wins, and the loser's freshly allocated record
    /// is tombstoned on the way out.
    ///
    /// # Errors
    /// - [`WorldError::InvalidName`] if the name fails validation
    /// - [`DbError::NameConflict`] if the name is taken
    /// - [`DbError::CapacityExceeded`] if the table is full
    pub async fn register_player(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Dbref, WorldError> {
        if !is_valid_player_name(name) {
            return Err(WorldError::InvalidName(name.to_string()));
        }

        // Hashing is the slow part; do it before touching any lock.
        let credential = Credential::hash(password)?;
        let dbref = self.table.allocate_player(name.trim(), credential).await?;

        if let Err(conflict) = self.directory.register(name, dbref).await {
            // Lost the race (or the name was simply taken). The orphan
            // record was never published, so tombstone it and report
            // the conflict.
            if let Err(e) = self.table.destroy(dbref).await {
                tracing::error!(%dbref, error = %e, "failed to reap orphan player record");
            }
            return Err(conflict.into());
        }

        tracing::info!(%dbref, name, "player created");
        Ok(dbref)
    }

    /// Verifies a name/password pair and returns the player's dbref.
    ///
    /// Does NOT establish a session — that is
    /// [`connect_player`](World::connect_player)'s job.
    ///
    /// # Errors
    /// Returns [`WorldError::AuthFailed`] for an unknown name AND for a
    /// wrong password, with no way to tell the cases apart.
    pub async fn authenticate(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Dbref, WorldError> {
        let dbref = self
            .directory
            .lookup(name)
            .await
            .ok_or(WorldError::AuthFailed)?;

        // A stale index entry (tombstoned record) fails the same way a
        // bad password does.
        let record = self
            .table
            .get(dbref)
            .await
            .map_err(|_| WorldError::AuthFailed)?;

        let verified = record
            .player()
            .is_some_and(|data| data.credential.verify(password));
        if !verified {
            tracing::debug!(%dbref, "authentication failed");
            return Err(WorldError::AuthFailed);
        }
        Ok(dbref)
    }

    /// Replaces the stored credential for `dbref`, provided `old`
    /// matches the current one.
    ///
    /// Verify-and-replace runs under the record's own write lock, so
    /// two concurrent changes for the same player serialize: the second
    /// one's `old` is checked against whatever the first one stored.
    ///
    /// Failure is surfaced, not silently swallowed — a caller that
    /// wants the fire-and-forget behavior can discard the result.
    ///
    /// # Errors
    /// - [`DbError::InvalidRef`] if `dbref` does not name a live player
    /// - [`WorldError::AuthFailed`] if `old` does not match
    pub async fn change_password(
        &self,
        dbref: Dbref,
        old: &str,
        new: &str,
    ) -> Result<(), WorldError> {
        let replacement = Credential::hash(new)?;

        self.table
            .mutate(dbref, |record| {
                let Some(data) = record.player_mut() else {
                    return Err(WorldError::Db(DbError::InvalidRef(dbref)));
                };
                if !data.credential.verify(old) {
                    return Err(WorldError::AuthFailed);
                }
                data.credential = replacement;
                Ok(())
            })
            .await??;

        tracing::info!(%dbref, "password changed");
        Ok(())
    }

    /// Renames a player, keeping the directory and the record in step.
    ///
    /// # Errors
    /// - [`WorldError::InvalidName`] if the new name fails validation
    /// - [`DbError::InvalidRef`] if `dbref` does not name a live player
    /// - [`DbError::NameConflict`] if the new name is taken
    pub async fn rename_player(
        &self,
        dbref: Dbref,
        new_name: &str,
    ) -> Result<(), WorldError> {
        if !is_valid_player_name(new_name) {
            return Err(WorldError::InvalidName(new_name.to_string()));
        }

        let record = self.table.get(dbref).await?;
        if !record.kind.is_player() {
            return Err(DbError::InvalidRef(dbref).into());
        }

        // Index first, record second. The directory checks that the old
        // name still maps to this dbref, which catches a racing rename.
        self.directory
            .rename(&record.name, new_name, dbref)
            .await?;
        self.table
            .mutate(dbref, |rec| rec.name = new_name.trim().to_string())
            .await?;
        Ok(())
    }

    /// Destroys a player: releases any live session, retires the name,
    /// and tombstones the record. The dbref is never reused.
    ///
    /// # Errors
    /// Returns [`DbError::InvalidRef`] if `dbref` does not name a live
    /// player; rooms and things are not destroyable through this path.
    pub async fn destroy_player(&self, dbref: Dbref) -> Result<(), WorldError> {
        let record = self.table.get(dbref).await?;
        if !record.kind.is_player() {
            return Err(DbError::InvalidRef(dbref).into());
        }

        {
            let mut sessions = self.sessions.lock().await;
            if sessions.is_connected(dbref) {
                sessions.notify(dbref, "*** You have been destroyed. ***").await;
                // Just checked; the session is there.
                let _ = sessions.release(dbref);
            }
        }

        let record = self.table.destroy(dbref).await?;
        self.directory.unregister(&record.name, dbref).await;
        Ok(())
    }

    /// Creates a room owned by `owner`.
    ///
    /// Rooms have no credential and no sessions; this exists so callers
    /// can build a world around the players.
    pub async fn create_room(
        &self,
        name: &str,
        owner: Dbref,
    ) -> Result<Dbref, WorldError> {
        let dbref = self.table.allocate(ObjectKind::Room, name, owner).await?;
        tracing::info!(%dbref, name, "room created");
        Ok(dbref)
    }
}
