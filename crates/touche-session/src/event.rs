//! # Operator Events
//!
//! Every operator action on the scoreboard is a [`MatchEvent`]. Applying an
//! event is a single exhaustive match over the variants, so adding an action
//! without deciding its effect on the match state does not compile.

use touche_core::{MatchDescriptor, MatchFormat, Side};
use touche_state::{Card, MatchState, PassivityCard};

/// One operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// Start the clock if stopped, stop it if running.
    StartPause,
    /// Set a score to an exact value.
    ChangeScore { side: Side, score: u32 },
    /// Add one touch, up to the current maximum score.
    IncrementScore(Side),
    /// Remove one touch, down to zero.
    DecrementScore(Side),
    /// Toggle a yellow card or append a red card.
    AddCard { side: Side, card: Card },
    /// Toggle a rung of the passivity ladder.
    SetPassivityCard(PassivityCard),
    /// Switch format and reinitialize the match.
    ChangeFormat(MatchFormat),
    /// Set the clock to an exact number of seconds.
    ChangeTime(u32),
    /// Step the minutes digit.
    AdjustMinutes { increment: bool },
    /// Step the seconds digits.
    AdjustSeconds { increment: bool },
    /// Stop the clock and rewind it to the start of the segment.
    ResetTime,
    /// Zero both scores.
    ResetScore,
    /// Withdraw every card, passivity included.
    ResetCards,
    /// Reinitialize the current format, keeping any tournament match.
    ResetAll,
    /// Exchange the competitors' sides.
    SwapSides,
    /// Give priority to a side and enter overtime.
    AssignPriority(Side),
    /// Ask the operator to assign priority (free-form only).
    RequestPriorityAssignment,
    /// Close the priority prompt without assigning.
    DismissPriorityAssignment,
    /// Move to the next team bout.
    AdvanceBout,
    /// Bind a tournament match and reinitialize.
    LoadExternalMatch(Box<MatchDescriptor>),
    /// Forget the tournament match and the competitor names.
    ClearExternalMatch,
}

impl MatchEvent {
    /// Apply the event to `state`.
    pub fn apply(self, state: &mut MatchState) {
        match self {
            Self::StartPause => state.start_pause(),
            Self::ChangeScore { side, score } => state.change_score(side, score),
            Self::IncrementScore(side) => {
                if !state.increment_score(side) {
                    tracing::debug!(%side, max = state.max_score(), "score at maximum");
                }
            }
            Self::DecrementScore(side) => {
                if !state.decrement_score(side) {
                    tracing::debug!(%side, "score at zero");
                }
            }
            Self::AddCard { side, card } => {
                state.add_card(side, card);
            }
            Self::SetPassivityCard(card) => {
                state.set_passivity_card(card);
            }
            Self::ChangeFormat(format) => state.change_format(format),
            Self::ChangeTime(seconds) => state.change_time(seconds),
            Self::AdjustMinutes { increment } => state.adjust_minutes(increment),
            Self::AdjustSeconds { increment } => state.adjust_seconds(increment),
            Self::ResetTime => state.reset_time(),
            Self::ResetScore => state.reset_score(),
            Self::ResetCards => state.reset_cards(),
            Self::ResetAll => state.reset_all(),
            Self::SwapSides => state.swap_sides(),
            Self::AssignPriority(side) => state.assign_priority(side),
            Self::RequestPriorityAssignment => {
                if !state.request_priority_assignment() {
                    tracing::debug!(format = %state.format(), "manual priority not available");
                }
            }
            Self::DismissPriorityAssignment => state.dismiss_priority_assignment(),
            Self::AdvanceBout => {
                if !state.advance_bout() {
                    tracing::debug!(bout = state.current_period(), "no further bout");
                }
            }
            Self::LoadExternalMatch(descriptor) => state.load_external_match(*descriptor),
            Self::ClearExternalMatch => state.clear_external_match(),
        }
    }
}
