//! Core identity types for the Mudkeep world database.
//!
//! Every layer of the stack — object table, player directory, session
//! manager, and the boundary facade — addresses objects through the
//! types defined here. Keeping them in a leaf crate means the database
//! and session layers can depend on them without depending on each other.

mod types;

pub use types::{Dbref, ObjectKind};
