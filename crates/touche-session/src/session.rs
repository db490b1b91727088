//! # Scoreboard Session
//!
//! [`Session`] is the single writer of a [`MatchState`]. Operator events and
//! clock ticks are serialized through one lock; after every mutation the
//! session reconciles the clock driver and the wake-lock with the running
//! flag and publishes a snapshot to subscribers.
//!
//! ```text
//!   operator ──apply(event)──┐
//!                            ▼
//!                   ┌──────────────────┐  snapshot   ┌────────────┐
//!   clock driver ──▶│ Mutex<Core>      │────────────▶│ watch<MS>  │──▶ renderers
//!     (tick)        │  state, gen,     │             └────────────┘
//!                   │  clock, wake     │
//!                   └──────────────────┘
//! ```
//!
//! ## Clock reconciliation
//!
//! - Running with no live driver for the current generation: bump the
//!   generation and spawn a driver.
//! - Stopped: bump the generation and drop the driver.
//! - Started with zero time left: the expiry rules run immediately.
//!
//! A driver that brings the clock to zero bumps the generation itself, so a
//! later start always gets a fresh driver.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use touche_client::{CredentialStore, KeyValueStore, TournamentClient};
use touche_core::MatchDescriptor;
use touche_state::{MatchState, Tick};

use crate::clock::{ClockHandle, TICK_PERIOD};
use crate::error::SessionError;
use crate::event::MatchEvent;
use crate::submission::{SubmissionStatus, SUBMITTED_FLASH};
use crate::wake::{NoopWakeLock, WakeController, WakeLock};

/// Credential store shared between the session and its callers.
pub type SharedCredentials = CredentialStore<Arc<dyn KeyValueStore>>;

/// Session timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Period of one clock tick.
    pub tick_period: Duration,
    /// How long a successful submission stays visible before the tournament
    /// match is cleared.
    pub submitted_flash: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_period: TICK_PERIOD,
            submitted_flash: SUBMITTED_FLASH,
        }
    }
}

// ─── Shared core ─────────────────────────────────────────────────────

pub(crate) struct Core {
    pub(crate) state: MatchState,
    generation: u64,
    clock: Option<ClockHandle>,
    wake: WakeController,
    /// Descriptor waiting for device registration.
    pub(crate) pending: Option<MatchDescriptor>,
    /// Timer clearing a submitted match.
    pub(crate) flash: Option<JoinHandle<()>>,
}

pub(crate) struct Shared {
    pub(crate) core: Mutex<Core>,
    snapshots: watch::Sender<MatchState>,
    pub(crate) submission: watch::Sender<SubmissionStatus>,
}

impl Shared {
    /// Sync the wake-lock and publish a snapshot.
    pub(crate) fn settle(&self, core: &mut Core) {
        core.wake.sync(core.state.is_running());
        self.snapshots.send_replace(core.state.clone());
    }

    fn on_tick(&self, generation: u64) -> bool {
        let mut core = self.core.lock();
        if core.generation != generation {
            return false;
        }
        let keep_going = match core.state.tick() {
            Tick::Counted { .. } => true,
            Tick::Expired(expiry) => {
                tracing::info!(?expiry, "clock reached zero");
                false
            }
            Tick::Ignored => false,
        };
        if !keep_going {
            core.generation += 1;
        }
        self.settle(&mut core);
        keep_going
    }
}

// ─── Session ─────────────────────────────────────────────────────────

/// A scoreboard session.
pub struct Session {
    id: Uuid,
    pub(crate) span: tracing::Span,
    runtime: Handle,
    pub(crate) config: SessionConfig,
    pub(crate) shared: Arc<Shared>,
    pub(crate) client: TournamentClient,
    pub(crate) credentials: SharedCredentials,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session with default timing and no platform wake-lock.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        client: TournamentClient,
        credentials: SharedCredentials,
    ) -> Result<Self, SessionError> {
        Self::with_config(
            SessionConfig::default(),
            client,
            credentials,
            Box::new(NoopWakeLock),
        )
    }

    /// Session with explicit timings and a platform wake lock.
    ///
    /// Must be called from inside a tokio runtime: the clock driver and the
    /// submission flash are spawned on it. Returns
    /// [`SessionError::NoRuntime`] otherwise.
    pub fn with_config(
        config: SessionConfig,
        client: TournamentClient,
        credentials: SharedCredentials,
        wake_lock: Box<dyn WakeLock>,
    ) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let id = Uuid::new_v4();
        let state = MatchState::default();
        let (snapshots, _) = watch::channel(state.clone());
        let (submission, _) = watch::channel(SubmissionStatus::Idle);
        let shared = Arc::new(Shared {
            core: Mutex::new(Core {
                state,
                generation: 0,
                clock: None,
                wake: WakeController::new(wake_lock),
                pending: None,
                flash: None,
            }),
            snapshots,
            submission,
        });
        let span = tracing::info_span!("session", id = %id);
        span.in_scope(|| tracing::info!("scoreboard session created"));
        Ok(Self {
            id,
            span,
            runtime,
            config,
            shared,
            client,
            credentials,
        })
    }

    /// Session identifier, used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Apply an operator event and return the resulting snapshot.
    pub fn apply(&self, event: MatchEvent) -> MatchState {
        let _entered = self.span.enter();
        let mut core = self.shared.core.lock();
        self.apply_locked(&mut core, event);
        core.state.clone()
    }

    pub(crate) fn apply_locked(&self, core: &mut Core, event: MatchEvent) {
        tracing::debug!(?event, "operator event");
        event.apply(&mut core.state);
        self.reconcile(core);
    }

    fn reconcile(&self, core: &mut Core) {
        if core.state.is_running() && core.state.time_remaining_seconds() == 0 {
            let expiry = core.state.on_clock_expired();
            tracing::info!(?expiry, "clock started at zero");
        }

        if core.state.is_running() {
            let live = core
                .clock
                .as_ref()
                .is_some_and(|clock| clock.is_live(core.generation));
            if !live {
                core.generation += 1;
                core.clock = Some(self.spawn_clock(core.generation));
            }
        } else if core.clock.take().is_some() {
            core.generation += 1;
        }

        self.shared.settle(core);
    }

    fn spawn_clock(&self, generation: u64) -> ClockHandle {
        let shared = Arc::clone(&self.shared);
        let span = self.span.clone();
        ClockHandle::spawn(
            &self.runtime,
            generation,
            self.config.tick_period,
            move || span.in_scope(|| shared.on_tick(generation)),
        )
    }

    pub(crate) fn spawn_task<F>(&self, future: F) -> JoinHandle<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(future)
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Current match state.
    pub fn snapshot(&self) -> MatchState {
        self.shared.core.lock().state.clone()
    }

    /// Receiver of a fresh snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<MatchState> {
        self.shared.snapshots.subscribe()
    }

    /// Receiver of submission status changes.
    pub fn submission_status(&self) -> watch::Receiver<SubmissionStatus> {
        self.shared.submission.subscribe()
    }

    /// Tournament match waiting for device registration, if any.
    pub fn pending_registration(&self) -> Option<MatchDescriptor> {
        self.shared.core.lock().pending.clone()
    }

    /// Whether the screen wake-lock is currently held.
    pub fn wake_lock_held(&self) -> bool {
        self.shared.core.lock().wake.is_held()
    }

    /// Device credential store.
    pub fn credentials(&self) -> &SharedCredentials {
        &self.credentials
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let mut core = self.shared.core.lock();
        core.generation += 1;
        core.clock = None;
        if let Some(flash) = core.flash.take() {
            flash.abort();
        }
        core.wake.sync(false);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use touche_client::{ClientConfig, MemoryStore};
    use touche_core::{MatchFormat, Side};
    use touche_state::MatchPhase;

    use crate::wake::tests::CountingWakeLock;

    fn credentials() -> SharedCredentials {
        CredentialStore::new(Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>)
    }

    fn session() -> Session {
        let client = TournamentClient::new(&ClientConfig::default()).unwrap();
        Session::new(client, credentials()).unwrap()
    }

    fn session_with_wake(lock: CountingWakeLock) -> Session {
        let client = TournamentClient::new(&ClientConfig::default()).unwrap();
        Session::with_config(SessionConfig::default(), client, credentials(), Box::new(lock))
            .unwrap()
    }

    async fn advance_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    // ── Runtime ──────────────────────────────────────────────────────

    #[test]
    fn test_new_outside_runtime_fails() {
        let client = TournamentClient::new(&ClientConfig::default()).unwrap();
        let err = Session::new(client, credentials()).unwrap_err();
        assert!(matches!(err, SessionError::NoRuntime));
    }

    // ── Clock driver ─────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_running_clock_counts_down() {
        let session = session();
        session.apply(MatchEvent::StartPause);
        advance_ms(3_500).await;
        assert_eq!(session.snapshot().time_remaining_seconds(), 177);
        assert!(session.snapshot().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let session = session();
        session.apply(MatchEvent::StartPause);
        advance_ms(2_500).await;
        session.apply(MatchEvent::StartPause);
        advance_ms(5_000).await;
        assert_eq!(session.snapshot().time_remaining_seconds(), 178);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_toggles_leave_one_driver() {
        let session = session();
        for _ in 0..5 {
            session.apply(MatchEvent::StartPause);
        }
        advance_ms(1_500).await;
        assert_eq!(session.snapshot().time_remaining_seconds(), 179);
        advance_ms(1_000).await;
        assert_eq!(session.snapshot().time_remaining_seconds(), 178);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_runs_to_end() {
        let session = session();
        session.apply(MatchEvent::ChangeTime(2));
        session.apply(MatchEvent::StartPause);
        advance_ms(5_000).await;

        let state = session.snapshot();
        assert_eq!(state.time_remaining_seconds(), 0);
        assert!(!state.is_running());
        assert_eq!(state.phase(), MatchPhase::Ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_expiry_gets_fresh_driver() {
        let session = session();
        session.apply(MatchEvent::ChangeTime(1));
        session.apply(MatchEvent::StartPause);
        advance_ms(1_500).await;
        assert!(!session.snapshot().is_running());

        session.apply(MatchEvent::ChangeTime(10));
        session.apply(MatchEvent::StartPause);
        advance_ms(2_500).await;
        assert_eq!(session.snapshot().time_remaining_seconds(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elimination_break_starts_stopped() {
        let session = session();
        session.apply(MatchEvent::ChangeFormat(MatchFormat::Elimination));
        session.apply(MatchEvent::ChangeTime(1));
        session.apply(MatchEvent::StartPause);
        advance_ms(1_500).await;

        let state = session.snapshot();
        assert!(state.is_break());
        assert!(!state.is_running());
        assert_eq!(state.time_remaining_seconds(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_at_zero_evaluates_expiry() {
        let session = session();
        session.apply(MatchEvent::ChangeFormat(MatchFormat::FreeForm));
        session.apply(MatchEvent::ChangeTime(0));
        let state = session.apply(MatchEvent::StartPause);

        assert!(!state.is_running());
        assert!(state.pending_priority_assignment());
        assert_eq!(state.phase(), MatchPhase::PendingPriorityAssignment);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_time_stops_driver() {
        let session = session();
        session.apply(MatchEvent::StartPause);
        advance_ms(2_500).await;
        session.apply(MatchEvent::ResetTime);
        advance_ms(3_000).await;
        let state = session.snapshot();
        assert!(!state.is_running());
        assert_eq!(state.time_remaining_seconds(), 180);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_ticks() {
        let session = session();
        let mut rx = session.subscribe();
        session.apply(MatchEvent::StartPause);
        rx.borrow_and_update();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().time_remaining_seconds(), 179);
    }

    // ── Wake lock ────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_wake_lock_follows_clock() {
        let lock = CountingWakeLock::default();
        let session = session_with_wake(lock.clone());

        session.apply(MatchEvent::StartPause);
        assert!(session.wake_lock_held());
        session.apply(MatchEvent::IncrementScore(Side::Left));
        assert_eq!(lock.acquired.load(Ordering::SeqCst), 1);

        session.apply(MatchEvent::StartPause);
        assert!(!session.wake_lock_held());
        assert_eq!(lock.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wake_lock_released_on_expiry_and_drop() {
        let lock = CountingWakeLock::default();
        let session = session_with_wake(lock.clone());

        session.apply(MatchEvent::ChangeTime(1));
        session.apply(MatchEvent::StartPause);
        advance_ms(1_500).await;
        assert!(!session.wake_lock_held());
        assert_eq!(lock.released.load(Ordering::SeqCst), 1);

        session.apply(MatchEvent::ChangeTime(30));
        session.apply(MatchEvent::StartPause);
        drop(session);
        assert_eq!(lock.released.load(Ordering::SeqCst), 2);
    }
}
