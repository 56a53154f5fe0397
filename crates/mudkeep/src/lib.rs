//! # Mudkeep
//!
//! A concurrent, multi-user world database: players, rooms, exits, and
//! things addressed by stable integer references (dbrefs), with
//! authenticated session establishment on top.
//!
//! The [`World`] service object wires the three layers together:
//! the object table and player directory (`mudkeep-db`), and the
//! session manager with its injected [`Notifier`](mudkeep_session::Notifier)
//! capability (`mudkeep-session`). Construct one at server start, share
//! it behind an `Arc`, and tear it down with
//! [`emergency_shutdown`](World::emergency_shutdown) — there is no
//! process-wide singleton.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mudkeep::prelude::*;
//!
//! # async fn demo() {
//! let world = WorldBuilder::new().build(NoopNotifier);
//!
//! let alice = world.create_player("alice", "pw1").await;
//! assert!(alice.is_valid());
//!
//! // Boundary convention: failures are the NOTHING sentinel, not errors.
//! assert_eq!(world.connect_player("alice", "wrong").await, Dbref::NOTHING);
//! assert_eq!(world.connect_player("alice", "pw1").await, alice);
//! # }
//! ```

mod error;
mod players;
pub mod telemetry;
mod world;

pub use error::WorldError;
pub use world::{World, WorldBuilder};

/// One-stop imports for typical callers.
pub mod prelude {
    pub use crate::{World, WorldBuilder, WorldError};
    pub use mudkeep_core::{Dbref, ObjectKind};
    pub use mudkeep_db::{ObjectRecord, TableConfig};
    pub use mudkeep_session::{NoopNotifier, Notifier, NotifyError};
}
