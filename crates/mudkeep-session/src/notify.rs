//! The notification bridge: how the core reaches a connected endpoint.
//!
//! The core never talks to a socket or a scripting layer directly.
//! Instead it is handed a [`Notifier`] at construction — a small
//! capability with one job: best-effort delivery of a line of text to
//! whatever endpoint is currently bound to a dbref. Production injects
//! the real transport; tests inject [`NoopNotifier`] or a recording
//! mock. No framework code changes either way.

use mudkeep_core::Dbref;

/// A delivery failure reported by a [`Notifier`].
///
/// Delivery is best-effort everywhere it is used: callers log this and
/// move on, they never let it abort the surrounding operation.
#[derive(Debug, thiserror::Error)]
#[error("notify delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Delivers out-of-band messages to connected endpoints.
///
/// # Trait bounds
///
/// - `Send + Sync` → shared across async tasks.
/// - `'static` → lives as long as the session manager that holds it.
pub trait Notifier: Send + Sync + 'static {
    /// Delivers `message` to the endpoint currently bound to `player`.
    ///
    /// The session manager only calls this for dbrefs it believes are
    /// connected, but the endpoint may have vanished underneath — in
    /// that case the implementation should return `Err` rather than
    /// block or panic. The manager additionally bounds every call with
    /// a delivery timeout, so even an implementation that hangs cannot
    /// wedge a sweep.
    fn notify(
        &self,
        player: Dbref,
        message: &str,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}

/// A notifier that silently discards everything.
///
/// Useful for tests that don't care about delivery, and for tools that
/// operate on the database without any connected endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    async fn notify(
        &self,
        _player: Dbref,
        _message: &str,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
