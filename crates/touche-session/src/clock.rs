//! # Clock Driver
//!
//! A Tokio task that fires a callback once per period while the match clock
//! runs. The callback decides whether the driver keeps going.
//!
//! ```text
//!   start ──▶ spawn(generation g) ──▶ sleep 1s ──▶ on_tick() ─┬─ true ──▶ sleep 1s …
//!                                                           └─ false ─▶ exit
//!   stop  ──▶ generation g+1, handle dropped (task aborted)
//! ```
//!
//! The owner keeps a generation counter next to the match state and checks
//! it inside the callback under the same lock. A driver whose generation is
//! stale therefore never mutates the state, even if it was mid-tick when it
//! was replaced. Dropping a [`ClockHandle`] aborts its task.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default tick period of the match clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owner of one running driver task.
#[derive(Debug)]
pub struct ClockHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl ClockHandle {
    /// Spawn a driver on `runtime`. The first callback fires one `period`
    /// after the call.
    pub fn spawn<F>(runtime: &Handle, generation: u64, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !on_tick() {
                    break;
                }
            }
            tracing::debug!(generation, "clock driver exited");
        });
        tracing::debug!(generation, "clock driver started");
        Self { generation, task }
    }

    /// Generation this driver was started for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the driver is still running for `generation`.
    pub fn is_live(&self, generation: u64) -> bool {
        self.generation == generation && !self.task.is_finished()
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
