//! The object table: stores every database object, addressed by dbref.
//!
//! # Concurrency note
//!
//! The table uses two levels of locking:
//!
//! - the slot vector sits behind one `RwLock`, taken for writing only
//!   on `allocate`/`destroy` (which change the set of slots);
//! - each record sits in its own `Arc<RwLock<_>>`, so reads and
//!   mutations of unrelated objects never contend, and two operations
//!   on the SAME object (say, two concurrent password changes) are
//!   strictly serialized by that record's write lock.
//!
//! Lock scopes are short and never held across `.await` points outside
//! this module; slow work (password hashing) happens before a lock is
//! taken.

use std::sync::Arc;

use mudkeep_core::{Dbref, ObjectKind};
use tokio::sync::RwLock;

use crate::{Credential, DbError, ObjectRecord, Payload, PlayerData};

// ---------------------------------------------------------------------------
// TableConfig
// ---------------------------------------------------------------------------

/// Configuration for the object table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum number of objects, counting tombstones (a destroyed
    /// object's slot is never reclaimed). `None` means the table grows
    /// without bound.
    pub max_objects: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { max_objects: None }
    }
}

// ---------------------------------------------------------------------------
// ObjectTable
// ---------------------------------------------------------------------------

/// One slot in the table.
///
/// A tombstone keeps the slot (and therefore every later dbref) stable
/// after an object is destroyed. Dbrefs are never reused.
enum Slot {
    Live(Arc<RwLock<ObjectRecord>>),
    Tombstone,
}

/// The store of all database objects.
///
/// Exclusively owns every [`ObjectRecord`]; the player directory and the
/// session manager hold only dbrefs into it. A dbref maps to the same
/// slot for the whole life of the table — there is no compaction.
pub struct ObjectTable {
    slots: RwLock<Vec<Slot>>,
    config: TableConfig,
}

impl ObjectTable {
    /// Creates an empty table with the given configuration.
    pub fn new(config: TableConfig) -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
            config,
        }
    }

    /// Allocates a non-player object (room, exit, or thing).
    ///
    /// # Errors
    /// Returns [`DbError::CapacityExceeded`] if the table is at its
    /// configured maximum.
    pub async fn allocate(
        &self,
        kind: ObjectKind,
        name: impl Into<String>,
        owner: Dbref,
    ) -> Result<Dbref, DbError> {
        debug_assert!(!kind.is_player(), "players go through allocate_player");
        self.insert(kind, name.into(), owner, Payload::Inert).await
    }

    /// Allocates a player object carrying the given credential.
    ///
    /// Players own themselves. The record is fully formed before the
    /// dbref is returned, so a caller can safely publish the dbref (for
    /// example by registering the name) the moment this returns.
    pub async fn allocate_player(
        &self,
        name: impl Into<String>,
        credential: Credential,
    ) -> Result<Dbref, DbError> {
        let name = name.into();
        let dbref = self
            .insert(
                ObjectKind::Player,
                name,
                Dbref::NOTHING,
                Payload::Player(PlayerData::new(credential)),
            )
            .await?;
        // Fix up the self-ownership now that the dbref is known.
        self.mutate(dbref, |rec| rec.owner = dbref).await?;
        Ok(dbref)
    }

    async fn insert(
        &self,
        kind: ObjectKind,
        name: String,
        owner: Dbref,
        payload: Payload,
    ) -> Result<Dbref, DbError> {
        let mut slots = self.slots.write().await;
        if let Some(max) = self.config.max_objects {
            if slots.len() >= max {
                return Err(DbError::CapacityExceeded(max));
            }
        }
        let dbref = Dbref(slots.len() as i64);
        let record = ObjectRecord {
            dbref,
            name,
            kind,
            owner,
            payload,
        };
        slots.push(Slot::Live(Arc::new(RwLock::new(record))));
        tracing::debug!(%dbref, %kind, "object allocated");
        Ok(dbref)
    }

    /// Clones out the record for `dbref`.
    ///
    /// # Errors
    /// Returns [`DbError::InvalidRef`] if the dbref was never allocated
    /// or the object has been tombstoned.
    pub async fn get(&self, dbref: Dbref) -> Result<ObjectRecord, DbError> {
        let cell = self.cell(dbref).await?;
        let record = cell.read().await;
        Ok(record.clone())
    }

    /// Applies an in-place update to the record for `dbref`, under that
    /// record's own write lock, and returns whatever the closure returns.
    ///
    /// Because the closure runs under the write lock, a check-then-set
    /// sequence inside it is atomic with respect to every other `mutate`
    /// on the same dbref.
    ///
    /// # Errors
    /// Returns [`DbError::InvalidRef`] under the same conditions as
    /// [`get`](Self::get).
    pub async fn mutate<T>(
        &self,
        dbref: Dbref,
        f: impl FnOnce(&mut ObjectRecord) -> T,
    ) -> Result<T, DbError> {
        let cell = self.cell(dbref).await?;
        let mut record = cell.write().await;
        Ok(f(&mut record))
    }

    /// Tombstones the object, returning its final record.
    ///
    /// The slot is retired permanently: the dbref will never name
    /// another object, and `get`/`mutate` on it fail with `InvalidRef`
    /// from now on.
    pub async fn destroy(&self, dbref: Dbref) -> Result<ObjectRecord, DbError> {
        let index = Self::index_of(dbref)?;
        let cell = {
            let mut slots = self.slots.write().await;
            let slot = slots
                .get_mut(index)
                .ok_or(DbError::InvalidRef(dbref))?;
            match std::mem::replace(slot, Slot::Tombstone) {
                Slot::Live(cell) => cell,
                Slot::Tombstone => return Err(DbError::InvalidRef(dbref)),
            }
            // Slot-vector lock released here; the record lock is taken
            // only after, so the two are never held together.
        };
        let record = cell.read().await.clone();
        tracing::info!(%dbref, name = %record.name, "object destroyed");
        Ok(record)
    }

    /// Returns the kind of the object at `dbref`.
    pub async fn kind(&self, dbref: Dbref) -> Result<ObjectKind, DbError> {
        Ok(self.get(dbref).await?.kind)
    }

    /// Returns `true` if `dbref` names a live (non-tombstoned) object.
    pub async fn contains(&self, dbref: Dbref) -> bool {
        self.cell(dbref).await.is_ok()
    }

    /// The number of slots ever allocated, including tombstones.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Returns `true` if nothing has ever been allocated.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Fetches the shared cell for `dbref`, holding the slot-vector
    /// lock only long enough to clone the `Arc`.
    async fn cell(&self, dbref: Dbref) -> Result<Arc<RwLock<ObjectRecord>>, DbError> {
        let index = Self::index_of(dbref)?;
        let slots = self.slots.read().await;
        match slots.get(index) {
            Some(Slot::Live(cell)) => Ok(Arc::clone(cell)),
            Some(Slot::Tombstone) | None => Err(DbError::InvalidRef(dbref)),
        }
    }

    fn index_of(dbref: Dbref) -> Result<usize, DbError> {
        usize::try_from(dbref.0).map_err(|_| DbError::InvalidRef(dbref))
    }
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================
