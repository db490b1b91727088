//! # touche-state - Match State Machine
//!
//! The core of the scoreboard. [`MatchState`] owns everything about the match
//! in progress and exposes one method per operator action or clock event.
//!
//! ## Modules
//!
//! - **Machine** (`machine.rs`): the state aggregate, clock expiry rules,
//!   scoring, resets, priority/overtime, team bout advancement and
//!   tournament match loading.
//!
//! - **Cards** (`cards.rs`): per-competitor yellow/red cards and the joint
//!   passivity ladder.
//!
//! - **Phase** (`phase.rs`): format-independent view
//!   (`Idle → Running → Break/Ended/...`) derived from the state fields.
//!
//! - **Result** (`result.rs`): winner determination and the submittable
//!   result record.
//!
//! ## Design
//!
//! Format-dependent behaviour is an exhaustive `match` on
//! [`touche_core::MatchFormat`] inside each operation, so adding a format
//! is a compile error at every rule that needs a decision. State is owned and
//! threaded by `&mut`; there is no ambient global match.

pub mod cards;
pub mod competitor;
pub mod machine;
pub mod phase;
pub mod result;

pub use cards::{Card, CardChange, CardSet, PassivityCard, PassivityLadder};
pub use competitor::CompetitorState;
pub use machine::{Expiry, MatchState, Tick};
pub use phase::MatchPhase;
pub use result::{MatchResult, Outcome, TIE_MARKER};
