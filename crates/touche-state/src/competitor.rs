//! Per-competitor scoring state.

use serde::{Deserialize, Serialize};

use touche_core::Side;

use crate::cards::CardSet;

/// Score, cards and name of the competitor currently on one side.
///
/// The whole value moves when the competitors swap ends, so
/// `starting_side` records where this competitor stood when the match was
/// loaded. Tournament results are keyed on it (`player1` started left).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorState {
    /// Touches scored.
    pub score: u32,
    /// Yellow/red cards in issue order.
    pub cards: CardSet,
    /// Name shown above the score, if the match came from a tournament.
    pub display_name: Option<String>,
    /// Side this competitor started on.
    pub starting_side: Side,
}

impl CompetitorState {
    /// Fresh competitor starting on `side`.
    pub fn new(starting_side: Side) -> Self {
        Self {
            score: 0,
            cards: CardSet::new(),
            display_name: None,
            starting_side,
        }
    }

    /// Clear score and cards, keeping identity.
    pub(crate) fn reset_scoring(&mut self) {
        self.score = 0;
        self.cards.clear();
    }
}
