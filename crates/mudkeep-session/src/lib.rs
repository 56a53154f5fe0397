//! Player session management for Mudkeep.
//!
//! This crate handles the lifecycle of live connections:
//!
//! 1. **Binding** — attaching an authenticated dbref to a transport
//!    endpoint ([`SessionManager::bind`])
//! 2. **Release** — tearing the binding down on disconnect
//! 3. **Emergency shutdown** — forcing every session down at once,
//!    notifying each endpoint first; deliveries are bounded by a
//!    timeout, so a bad endpoint never blocks the sweep
//!
//! Delivery to endpoints goes through the injected [`Notifier`]
//! capability — a real transport in production, a no-op or recording
//! mock in tests.
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)   ← authenticates, then binds a session here
//!     ↕
//! Session layer (this crate)  ← who is connected, and how to reach them
//!     ↕
//! Core (below)     ← Dbref
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod manager;
mod notify;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use notify::{NoopNotifier, Notifier, NotifyError};
pub use session::{ConnectionId, Session};
