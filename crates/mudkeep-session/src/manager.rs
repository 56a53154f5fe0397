//! The session manager: tracks every live player connection.
//!
//! Responsibilities:
//! - Binding an authenticated dbref to a connection ([`bind`](SessionManager::bind))
//! - Releasing the binding on disconnect ([`release`](SessionManager::release))
//! - Evicting the old connection when a player connects again
//! - Best-effort delivery to one player ([`notify`](SessionManager::notify))
//! - The emergency shutdown sweep
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it uses a plain
//! `HashMap`, not a concurrent one. This is intentional: the manager is
//! owned by the facade and guarded by a single async mutex there. That
//! one mutex is also what gives shutdown its ordering guarantee — an
//! in-flight bind holds the lock until it settles, so the shutdown
//! sweep runs strictly before or strictly after it, never interleaved.

use std::collections::HashMap;
use std::time::Duration;

use mudkeep_core::Dbref;

use crate::{Notifier, NotifyError, Session, SessionError};

/// Sent to the old endpoint when a second connection takes over.
const EVICTION_NOTICE: &str = "*** Your character has connected from another location. ***";

/// Sent to every connected endpoint during the emergency shutdown sweep.
const SHUTDOWN_NOTICE: &str = "*** Emergency shutdown. ***";

/// How long one notifier call may run before it counts as failed.
///
/// Every delivery the manager makes goes through this bound, so a hung
/// endpoint can delay a sweep by at most this much per session and can
/// never wedge it.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tracks all live sessions and owns the [`Notifier`] capability.
///
/// ## Lifecycle of one player
///
/// ```text
/// (authenticated) ──bind()──→ [Connected] ──release()──→ (gone)
///                                  │
///                    bind() again  │ emergency_shutdown()
///                    (evicts old)  ▼
///                               (gone, manager latched shut)
/// ```
pub struct SessionManager<N: Notifier> {
    /// All live sessions, keyed by dbref. At most one per player —
    /// that is the key invariant of the whole layer.
    sessions: HashMap<Dbref, Session>,

    /// Delivery capability, injected at construction.
    notifier: N,

    /// Latched by the first emergency shutdown; refuses new binds.
    shutting_down: bool,
}

impl<N: Notifier> SessionManager<N> {
    /// Creates an empty manager around the given notifier.
    pub fn new(notifier: N) -> Self {
        Self {
            sessions: HashMap::new(),
            notifier,
            shutting_down: false,
        }
    }

    /// Binds `dbref` to a fresh connection after successful
    /// authentication.
    ///
    /// If the player already has a live session, the old one is evicted:
    /// its endpoint gets a courtesy notice (best-effort) and the binding
    /// is replaced. The policy alternative — refusing the second
    /// connect — locks a player out whenever their client crashes
    /// without a clean disconnect, so eviction wins.
    ///
    /// # Errors
    /// Returns [`SessionError::ShuttingDown`] after the emergency
    /// shutdown sweep has run.
    pub async fn bind(&mut self, dbref: Dbref) -> Result<&Session, SessionError> {
        if self.shutting_down {
            return Err(SessionError::ShuttingDown);
        }

        if let Some(old) = self.sessions.remove(&dbref) {
            tracing::info!(%dbref, connection = %old.connection, "evicting prior session");
            if let Err(e) = self.deliver(dbref, EVICTION_NOTICE).await {
                tracing::debug!(%dbref, error = %e, "eviction notice undeliverable");
            }
        }

        let session = Session::new(dbref);
        tracing::info!(%dbref, connection = %session.connection, "session bound");
        self.sessions.insert(dbref, session);

        // The entry was inserted on the line above; the invariant makes
        // this lookup infallible.
        Ok(self.sessions.get(&dbref).expect("just inserted"))
    }

    /// Releases the session for `dbref` (disconnect or transport error).
    ///
    /// The object record is untouched — only the binding dies.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] if no session exists.
    pub fn release(&mut self, dbref: Dbref) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&dbref)
            .ok_or(SessionError::NotConnected(dbref))?;
        tracing::info!(%dbref, connection = %session.connection, "session released");
        Ok(session)
    }

    /// Best-effort delivery of `message` to `dbref`.
    ///
    /// A no-op — not an error — if the player has no live session; the
    /// contract lets callers notify freely without checking first.
    /// Delivery failures are logged and swallowed.
    pub async fn notify(&self, dbref: Dbref, message: &str) {
        if !self.sessions.contains_key(&dbref) {
            return;
        }
        if let Err(e) = self.deliver(dbref, message).await {
            tracing::warn!(%dbref, error = %e, "notify delivery failed");
        }
    }

    /// Runs one notifier call under [`NOTIFY_TIMEOUT`].
    ///
    /// An endpoint that neither succeeds nor fails within the bound is
    /// reported as a failed delivery, so no session operation ever
    /// waits on a wedged connection longer than the timeout.
    async fn deliver(&self, dbref: Dbref, message: &str) -> Result<(), NotifyError> {
        match tokio::time::timeout(NOTIFY_TIMEOUT, self.notifier.notify(dbref, message)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError(format!(
                "delivery timed out after {NOTIFY_TIMEOUT:?}"
            ))),
        }
    }

    /// Forces every live session to disconnected, at once.
    ///
    /// Each bound endpoint is notified first; a failing or timed-out
    /// notification is logged and the sweep continues to the next
    /// session — shutdown never waits on a misbehaving endpoint beyond
    /// the per-delivery timeout and is not retried. Idempotent: a
    /// second call finds no sessions and an already-set latch. Returns
    /// the dbrefs that were swept, so the caller can update their
    /// records.
    pub async fn emergency_shutdown(&mut self) -> Vec<Dbref> {
        if !self.shutting_down {
            tracing::warn!(
                live_sessions = self.sessions.len(),
                "emergency shutdown sweep starting"
            );
        }
        self.shutting_down = true;

        let mut swept = Vec::with_capacity(self.sessions.len());
        let drained: Vec<_> = self.sessions.drain().collect();
        for (dbref, session) in drained {
            if let Err(e) = self.deliver(dbref, SHUTDOWN_NOTICE).await {
                tracing::warn!(
                    %dbref,
                    connection = %session.connection,
                    error = %e,
                    "shutdown notice undeliverable, continuing sweep"
                );
            }
            swept.push(dbref);
        }
        swept
    }

    /// Returns `true` if `dbref` has a live session.
    pub fn is_connected(&self, dbref: Dbref) -> bool {
        self.sessions.contains_key(&dbref)
    }

    /// Looks up the live session for `dbref`, if any.
    pub fn get(&self, dbref: Dbref) -> Option<&Session> {
        self.sessions.get(&dbref)
    }

    /// Returns `true` once the shutdown latch is set.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// The number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no one is connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`, naming convention
    //! `test_{function}_{scenario}_{expected}`.
    //!
    //! Delivery behavior is observed through two mock notifiers: one
    //! that records every message, and one that always fails (to prove
    //! the shutdown sweep keeps going).

    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{NoopNotifier, Notifier, NotifyError};

    /// Records every (dbref, message) pair it is asked to deliver.
    #[derive(Clone, Default)]
    struct RecordingNotifier {
        delivered: Arc<Mutex<Vec<(Dbref, String)>>>,
    }

    impl Notifier for RecordingNotifier {
        async fn notify(
            &self,
            player: Dbref,
            message: &str,
        ) -> Result<(), NotifyError> {
            self.delivered
                .lock()
                .unwrap()
                .push((player, message.to_string()));
            Ok(())
        }
    }

    /// Always fails delivery.
    struct DeadNotifier;

    impl Notifier for DeadNotifier {
        async fn notify(
            &self,
            _player: Dbref,
            _message: &str,
        ) -> Result<(), NotifyError> {
            Err(NotifyError("endpoint gone".to_string()))
        }
    }

    /// Never resolves: a wedged endpoint that neither acks nor fails.
    struct HungNotifier;

    impl Notifier for HungNotifier {
        async fn notify(
            &self,
            _player: Dbref,
            _message: &str,
        ) -> Result<(), NotifyError> {
            std::future::pending().await
        }
    }

    fn recording() -> RecordingNotifier {
        RecordingNotifier::default()
    }

    // =====================================================================
    // bind()
    // =====================================================================

    #[tokio::test]
    async fn test_bind_new_player_creates_session() {
        let mut mgr = SessionManager::new(NoopNotifier);

        let session = mgr.bind(Dbref(1)).await.expect("should bind");

        assert_eq!(session.dbref, Dbref(1));
        assert!(mgr.is_connected(Dbref(1)));
        assert_eq!(mgr.len(), 1);
    }

    #[tokio::test]
    async fn test_bind_twice_evicts_prior_session() {
        let rec = recording();
        let mut mgr = SessionManager::new(rec.clone());

        let first = mgr.bind(Dbref(1)).await.unwrap().connection;
        let second = mgr.bind(Dbref(1)).await.unwrap().connection;

        // Still exactly one session, under a fresh connection.
        assert_eq!(mgr.len(), 1);
        assert_ne!(first, second);

        // The old endpoint got the eviction notice.
        let delivered = rec.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, Dbref(1));
        assert!(delivered[0].1.contains("another location"));
    }

    #[tokio::test]
    async fn test_bind_after_shutdown_is_refused() {
        let mut mgr = SessionManager::new(NoopNotifier);
        mgr.emergency_shutdown().await;

        let result = mgr.bind(Dbref(1)).await;

        assert!(matches!(result, Err(SessionError::ShuttingDown)));
    }

    // =====================================================================
    // release()
    // =====================================================================

    #[tokio::test]
    async fn test_release_connected_player_removes_session() {
        let mut mgr = SessionManager::new(NoopNotifier);
        mgr.bind(Dbref(1)).await.unwrap();

        mgr.release(Dbref(1)).expect("should release");

        assert!(!mgr.is_connected(Dbref(1)));
        assert!(mgr.is_empty());
    }

    #[tokio::test]
    async fn test_release_unknown_player_is_not_connected() {
        let mut mgr = SessionManager::new(NoopNotifier);

        let result = mgr.release(Dbref(9));

        assert!(
            matches!(result, Err(SessionError::NotConnected(d)) if d == Dbref(9))
        );
    }

    #[tokio::test]
    async fn test_release_then_bind_again_works() {
        // Disconnect then reconnect: the terminal state is re-entrant.
        let mut mgr = SessionManager::new(NoopNotifier);
        mgr.bind(Dbref(1)).await.unwrap();
        mgr.release(Dbref(1)).unwrap();

        mgr.bind(Dbref(1)).await.expect("rebinding should work");
        assert!(mgr.is_connected(Dbref(1)));
    }

    // =====================================================================
    // notify()
    // =====================================================================

    #[tokio::test]
    async fn test_notify_connected_player_delivers() {
        let rec = recording();
        let mut mgr = SessionManager::new(rec.clone());
        mgr.bind(Dbref(1)).await.unwrap();

        mgr.notify(Dbref(1), "hello").await;

        let delivered = rec.delivered.lock().unwrap();
        assert_eq!(delivered.as_slice(), &[(Dbref(1), "hello".to_string())]);
    }

    #[tokio::test]
    async fn test_notify_disconnected_player_is_noop() {
        let rec = recording();
        let mgr = SessionManager::new(rec.clone());

        mgr.notify(Dbref(1), "hello").await;

        assert!(rec.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notify_hung_endpoint_returns_after_timeout() {
        let mut mgr = SessionManager::new(HungNotifier);
        mgr.bind(Dbref(1)).await.unwrap();

        // Paused time fast-forwards through the delivery timeout; the
        // call must come back instead of waiting on the endpoint.
        mgr.notify(Dbref(1), "hello").await;

        assert!(mgr.is_connected(Dbref(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bind_eviction_notice_to_hung_endpoint_still_rebinds() {
        let mut mgr = SessionManager::new(HungNotifier);
        let first = mgr.bind(Dbref(1)).await.unwrap().connection;

        let second = mgr.bind(Dbref(1)).await.unwrap().connection;

        assert_ne!(first, second);
        assert_eq!(mgr.len(), 1);
    }

    #[tokio::test]
    async fn test_notify_delivery_failure_is_swallowed() {
        let mut mgr = SessionManager::new(DeadNotifier);
        mgr.bind(Dbref(1)).await.unwrap();

        // Must not panic or error; failure is logged and dropped.
        mgr.notify(Dbref(1), "hello").await;

        assert!(mgr.is_connected(Dbref(1)));
    }

    // =====================================================================
    // emergency_shutdown()
    // =====================================================================

    #[tokio::test]
    async fn test_emergency_shutdown_sweeps_all_sessions() {
        let rec = recording();
        let mut mgr = SessionManager::new(rec.clone());
        mgr.bind(Dbref(1)).await.unwrap();
        mgr.bind(Dbref(2)).await.unwrap();
        mgr.bind(Dbref(3)).await.unwrap();

        let mut swept = mgr.emergency_shutdown().await;
        swept.sort();

        assert_eq!(swept, vec![Dbref(1), Dbref(2), Dbref(3)]);
        assert!(mgr.is_empty());
        assert!(mgr.is_shutting_down());

        // Every endpoint was told first.
        assert_eq!(rec.delivered.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_emergency_shutdown_continues_past_dead_endpoints() {
        // A misbehaving endpoint must not stall the sweep: with a
        // notifier that always fails, every session still goes down.
        let mut mgr = SessionManager::new(DeadNotifier);
        mgr.bind(Dbref(1)).await.unwrap();
        mgr.bind(Dbref(2)).await.unwrap();

        let swept = mgr.emergency_shutdown().await;

        assert_eq!(swept.len(), 2);
        assert!(mgr.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_emergency_shutdown_times_out_hung_endpoints() {
        // Endpoints that hang forever bound the sweep by the delivery
        // timeout per session; every session still goes down.
        let mut mgr = SessionManager::new(HungNotifier);
        mgr.bind(Dbref(1)).await.unwrap();
        mgr.bind(Dbref(2)).await.unwrap();

        let swept = mgr.emergency_shutdown().await;

        assert_eq!(swept.len(), 2);
        assert!(mgr.is_empty());
        assert!(mgr.is_shutting_down());
    }

    #[tokio::test]
    async fn test_emergency_shutdown_is_idempotent() {
        let mut mgr = SessionManager::new(NoopNotifier);
        mgr.bind(Dbref(1)).await.unwrap();

        let first = mgr.emergency_shutdown().await;
        let second = mgr.emergency_shutdown().await;

        assert_eq!(first.len(), 1);
        assert!(second.is_empty(), "second sweep finds nothing");
        assert!(mgr.is_shutting_down());
    }

    #[tokio::test]
    async fn test_notify_after_shutdown_is_noop() {
        let rec = recording();
        let mut mgr = SessionManager::new(rec.clone());
        mgr.bind(Dbref(1)).await.unwrap();
        mgr.emergency_shutdown().await;
        rec.delivered.lock().unwrap().clear();

        mgr.notify(Dbref(1), "anyone there?").await;

        assert!(rec.delivered.lock().unwrap().is_empty());
    }

    // =====================================================================
    // get()
    // =====================================================================

    #[tokio::test]
    async fn test_get_returns_live_session_only() {
        let mut mgr = SessionManager::new(NoopNotifier);
        mgr.bind(Dbref(1)).await.unwrap();

        assert!(mgr.get(Dbref(1)).is_some());
        assert!(mgr.get(Dbref(2)).is_none());

        mgr.release(Dbref(1)).unwrap();
        assert!(mgr.get(Dbref(1)).is_none());
    }
}
