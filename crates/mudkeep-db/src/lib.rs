//! The Mudkeep object database: a concurrent, in-memory table of world
//! objects plus the name index built over it.
//!
//! This crate owns two pieces:
//!
//! 1. **Object Table** ([`ObjectTable`]) — the store of all database
//!    objects (players, rooms, exits, things), addressed by a stable
//!    [`Dbref`](mudkeep_core::Dbref). Records live in their own locks,
//!    so unrelated objects never contend.
//! 2. **Player Directory** ([`PlayerDirectory`]) — the case-insensitive
//!    name → dbref index. Non-owning: it only holds references into the
//!    table and must be updated on every create/rename/destroy.
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)   ← wires table + directory + sessions into services
//!     ↕
//! DB layer (this crate)  ← object identity, records, credentials
//!     ↕
//! Core (below)     ← Dbref, ObjectKind
//! ```

mod credential;
mod directory;
mod error;
mod record;
mod table;

pub use credential::Credential;
pub use directory::{PlayerDirectory, is_valid_player_name};
pub use error::DbError;
pub use record::{ObjectRecord, Payload, PlayerData};
pub use table::{ObjectTable, TableConfig};
