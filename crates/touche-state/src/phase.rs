//! Format-independent view of where a match stands.
//!
//! ```text
//! Idle ──start──▶ Running ──pause──▶ Idle
//!                    │
//!                    └─clock hits 0─▶ Break | Idle (next period)
//!                                     | PendingPriorityAssignment | Ended
//! PendingPriorityAssignment ──assign priority──▶ Overtime
//! Overtime ──clock hits 0──▶ Ended
//! any ──reset / format change / tournament load──▶ Idle
//! ```
//!
//! `Ended` only means no further automatic transition fires; operator actions
//! still move the match back to `Idle`.

use serde::{Deserialize, Serialize};

use crate::machine::MatchState;

/// Where the match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Regulation clock stopped with time left.
    Idle,
    /// Regulation clock running.
    Running,
    /// Elimination break, running or not.
    Break,
    /// Overtime segment, running or not.
    Overtime,
    /// Regulation ended tied; waiting for the operator to assign priority.
    PendingPriorityAssignment,
    /// Clock at zero with nothing left to run.
    Ended,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Break => "BREAK",
            Self::Overtime => "OVERTIME",
            Self::PendingPriorityAssignment => "PRIORITY",
            Self::Ended => "ENDED",
        };
        f.write_str(s)
    }
}

impl MatchState {
    /// Derive the current phase from the state fields.
    pub fn phase(&self) -> MatchPhase {
        if self.pending_priority_assignment() {
            MatchPhase::PendingPriorityAssignment
        } else if !self.is_running() && self.time_remaining_seconds() == 0 {
            MatchPhase::Ended
        } else if self.is_break() {
            MatchPhase::Break
        } else if self.is_overtime() {
            MatchPhase::Overtime
        } else if self.is_running() {
            MatchPhase::Running
        } else {
            MatchPhase::Idle
        }
    }
}
