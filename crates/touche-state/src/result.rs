//! # Result Assembly
//!
//! Turns a finished [`MatchState`] and its tournament identity into the
//! record the tournament system expects.
//!
//! The winner is the competitor with more touches. On a tie the priority
//! holder wins, but only once overtime has been fenced out; a tie with no
//! resolved priority is reported with the literal [`TIE_MARKER`].
//!
//! Tournament results are keyed on competitors, not ends of the piste:
//! `player1` is whoever started on the left, even after the competitors
//! swapped ends.

use serde::{Deserialize, Serialize};

use touche_core::Side;

use crate::machine::MatchState;

/// Winner string for a match that ended level.
pub const TIE_MARKER: &str = "tie";

/// Who won, by current side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The competitor on this side won.
    Winner(Side),
    /// Level with no priority resolved.
    Tie,
}

impl Outcome {
    /// Decide the outcome from the two scores and the resolved priority.
    pub fn decide(left: u32, right: u32, resolved_priority: Option<Side>) -> Self {
        match left.cmp(&right) {
            std::cmp::Ordering::Greater => Self::Winner(Side::Left),
            std::cmp::Ordering::Less => Self::Winner(Side::Right),
            std::cmp::Ordering::Equal => resolved_priority.map_or(Self::Tie, Self::Winner),
        }
    }
}

/// A submittable match result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Tournament match identifier.
    pub match_id: String,
    /// Touches of the competitor now on the left.
    pub left_score: u32,
    /// Touches of the competitor now on the right.
    pub right_score: u32,
    /// Winner by current side.
    pub outcome: Outcome,
    /// Touches of the competitor who started on the left.
    pub player1_hits: u32,
    /// Touches of the competitor who started on the right.
    pub player2_hits: u32,
    /// Winner's tournament name, or [`TIE_MARKER`].
    pub winner: String,
    /// Device credential, present only when the tournament requires it.
    pub credential: Option<String>,
}

impl MatchResult {
    /// Assemble the result of the loaded tournament match.
    ///
    /// Returns `None` when no tournament match is loaded. `credential` is
    /// attached only if the descriptor requires submitter identity.
    pub fn assemble(state: &MatchState, credential: Option<&str>) -> Option<Self> {
        let descriptor = state.external_match()?;

        let left_score = state.score(Side::Left);
        let right_score = state.score(Side::Right);
        let resolved_priority = state
            .priority_side()
            .filter(|_| state.overtime_concluded());
        let outcome = Outcome::decide(left_score, right_score, resolved_priority);

        let winner = match outcome {
            Outcome::Winner(side) => descriptor
                .player(state.competitor(side).starting_side)
                .to_string(),
            Outcome::Tie => TIE_MARKER.to_string(),
        };

        let hits_of = |starting: Side| {
            Side::BOTH
                .into_iter()
                .find(|side| state.competitor(*side).starting_side == starting)
                .map_or(0, |side| state.score(side))
        };

        let credential = if descriptor.require_submitter_identity {
            credential.map(str::to_string)
        } else {
            None
        };

        Some(Self {
            match_id: descriptor.match_id.clone(),
            left_score,
            right_score,
            outcome,
            player1_hits: hits_of(Side::Left),
            player2_hits: hits_of(Side::Right),
            winner,
            credential,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touche_core::{MatchDescriptor, MatchFormat};

    fn descriptor(require_identity: bool) -> MatchDescriptor {
        MatchDescriptor {
            match_id: "m-9".to_string(),
            player1: "Kim".to_string(),
            player2: "Rossi".to_string(),
            tournament_id: 3,
            round: 2,
            base_uri: String::new(),
            submit_url: "https://t.example/result".to_string(),
            require_submitter_identity: require_identity,
        }
    }

    fn loaded(format: MatchFormat, left: u32, right: u32) -> MatchState {
        let mut state = MatchState::new(format);
        state.load_external_match(descriptor(false));
        state.change_score(Side::Left, left);
        state.change_score(Side::Right, right);
        state
    }

    #[test]
    fn test_higher_score_wins() {
        let state = loaded(MatchFormat::Elimination, 8, 3);
        let result = MatchResult::assemble(&state, None).unwrap();
        assert_eq!(result.outcome, Outcome::Winner(Side::Left));
        assert_eq!(result.winner, "Kim");
        assert_eq!(result.player1_hits, 8);
        assert_eq!(result.player2_hits, 3);
    }

    #[test]
    fn test_priority_decides_concluded_overtime() {
        let mut state = loaded(MatchFormat::Elimination, 5, 5);
        state.assign_priority(Side::Right);
        state.change_time(0);
        state.on_clock_expired();

        let result = MatchResult::assemble(&state, None).unwrap();
        assert_eq!(result.outcome, Outcome::Winner(Side::Right));
        assert_eq!(result.winner, "Rossi");
    }

    #[test]
    fn test_unresolved_tie() {
        let state = loaded(MatchFormat::Pool, 5, 5);
        let result = MatchResult::assemble(&state, None).unwrap();
        assert_eq!(result.outcome, Outcome::Tie);
        assert_eq!(result.winner, TIE_MARKER);
    }

    #[test]
    fn test_priority_does_not_count_before_overtime_ends() {
        let mut state = loaded(MatchFormat::FreeForm, 2, 2);
        state.assign_priority(Side::Left);
        let result = MatchResult::assemble(&state, None).unwrap();
        assert_eq!(result.outcome, Outcome::Tie);
    }

    #[test]
    fn test_hits_follow_competitors_across_swap() {
        let mut state = loaded(MatchFormat::Pool, 4, 1);
        state.swap_sides();
        let result = MatchResult::assemble(&state, None).unwrap();
        assert_eq!(result.left_score, 1);
        assert_eq!(result.right_score, 4);
        assert_eq!(result.player1_hits, 4);
        assert_eq!(result.player2_hits, 1);
        assert_eq!(result.outcome, Outcome::Winner(Side::Right));
        assert_eq!(result.winner, "Kim");
    }

    #[test]
    fn test_credential_attached_only_when_required() {
        let state = loaded(MatchFormat::Pool, 1, 0);
        let result = MatchResult::assemble(&state, Some("tok")).unwrap();
        assert_eq!(result.credential, None);

        let mut state = MatchState::default();
        state.load_external_match(descriptor(true));
        let result = MatchResult::assemble(&state, Some("tok")).unwrap();
        assert_eq!(result.credential.as_deref(), Some("tok"));
    }

    #[test]
    fn test_no_result_without_tournament_match() {
        assert!(MatchResult::assemble(&MatchState::default(), None).is_none());
    }
}
