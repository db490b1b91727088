//! Screen wake-lock control.
//!
//! The display must stay on while the clock runs. [`WakeController`] follows
//! the clock's running flag: it acquires the platform lock on the rising
//! edge, releases it on the falling edge, and releases on drop. A platform
//! that refuses the lock is logged and otherwise ignored.

use crate::error::WakeLockError;

/// A platform screen wake-lock.
pub trait WakeLock: Send {
    fn acquire(&mut self) -> Result<(), WakeLockError>;
    fn release(&mut self) -> Result<(), WakeLockError>;
}

/// Wake-lock for platforms without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        Ok(())
    }
}

/// Holds a [`WakeLock`] exactly while the clock runs.
pub struct WakeController {
    lock: Box<dyn WakeLock>,
    held: bool,
}

impl std::fmt::Debug for WakeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WakeController")
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}

impl WakeController {
    pub fn new(lock: Box<dyn WakeLock>) -> Self {
        Self { lock, held: false }
    }

    /// Whether the platform lock is currently held.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Acquire or release to match `running`.
    pub fn sync(&mut self, running: bool) {
        match (running, self.held) {
            (true, false) => match self.lock.acquire() {
                Ok(()) => {
                    self.held = true;
                    tracing::debug!("wake lock acquired");
                }
                Err(e) => tracing::warn!(error = %e, "wake lock request failed"),
            },
            (false, true) => self.release(),
            _ => {}
        }
    }

    fn release(&mut self) {
        self.held = false;
        match self.lock.release() {
            Ok(()) => tracing::debug!("wake lock released"),
            Err(e) => tracing::warn!(error = %e, "wake lock release failed"),
        }
    }
}

impl Drop for WakeController {
    fn drop(&mut self) {
        if self.held {
            self.release();
        }
    }
}
