//! # touche-session - Scoreboard Session
//!
//! Runs a match: owns the single [`touche_state::MatchState`], drives its
//! clock once per second, keeps the screen awake while the clock runs, and
//! connects the match to a tournament system.
//!
//! ## Modules
//!
//! - [`session`]: the single-writer [`Session`] and its snapshot channel.
//! - [`event`]: [`MatchEvent`], one variant per operator action.
//! - [`clock`]: the one-second driver task.
//! - [`wake`]: wake-lock trait and the controller that follows the clock.
//! - [`scan`]: QR scanning sessions yielding a match descriptor.
//! - [`submission`]: registration gating and result submission.
//!
//! ## Concurrency
//!
//! All state mutations take one `parking_lot::Mutex`. No lock is held across
//! an `.await`; network calls work from snapshots and re-take the lock to
//! apply their outcome.

pub mod clock;
pub mod error;
pub mod event;
pub mod scan;
pub mod session;
pub mod submission;
pub mod wake;

pub use clock::{ClockHandle, TICK_PERIOD};
pub use error::{ScanError, SessionError, WakeLockError};
pub use event::MatchEvent;
pub use scan::{PayloadSource, ScanSession};
pub use session::{Session, SessionConfig, SharedCredentials};
pub use submission::{submission_body, LoadOutcome, SubmissionStatus, SUBMITTED_FLASH};
pub use wake::{NoopWakeLock, WakeController, WakeLock};
