//! Plain-text rendering of the scoreboard.

use std::fmt::Write as _;

use touche_core::{MatchFormat, Side};
use touche_session::SubmissionStatus;
use touche_state::{MatchPhase, MatchState, PassivityCard};

/// `M:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn segment_label(state: &MatchState) -> String {
    match state.format() {
        MatchFormat::Team => format!("bout {}/{}", state.current_period(), state.total_periods()),
        MatchFormat::Elimination if state.is_break() => {
            format!("break after period {}", state.current_period())
        }
        MatchFormat::Elimination => {
            format!("period {}/{}", state.current_period(), state.total_periods())
        }
        MatchFormat::Pool | MatchFormat::FreeForm => String::new(),
    }
}

fn competitor_name(state: &MatchState, side: Side) -> String {
    state
        .competitor(side)
        .display_name
        .clone()
        .unwrap_or_else(|| side.as_str().to_ascii_uppercase())
}

fn cards_line(state: &MatchState, side: Side) -> String {
    let cards = &state.competitor(side).cards;
    if cards.is_empty() {
        return "-".to_string();
    }
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the whole board.
pub fn render(state: &MatchState, submission: &SubmissionStatus) -> String {
    let mut out = String::new();
    let phase = state.phase();

    let _ = writeln!(
        out,
        "[{}] {}  {}  {}  (to {})",
        state.format().as_str().to_ascii_uppercase(),
        segment_label(state),
        format_clock(state.time_remaining_seconds()),
        phase,
        state.max_score(),
    );

    let left = competitor_name(state, Side::Left);
    let right = competitor_name(state, Side::Right);
    let _ = writeln!(
        out,
        "  {left:<20} {:>3} : {:<3} {right:>20}",
        state.score(Side::Left),
        state.score(Side::Right),
    );
    let _ = writeln!(
        out,
        "  cards {:<20}{:>22}",
        cards_line(state, Side::Left),
        cards_line(state, Side::Right),
    );

    if !state.passivity().is_empty() {
        let rungs: Vec<&str> = state
            .passivity()
            .as_slice()
            .iter()
            .map(|card| match card {
                PassivityCard::PassivityYellow => "yellow",
                PassivityCard::PassivityRed => "red",
            })
            .collect();
        let _ = writeln!(out, "  passivity {}", rungs.join(" "));
    }
    if let Some(side) = state.priority_side() {
        let _ = writeln!(out, "  priority {} ({})", competitor_name(state, side), side);
    }
    if phase == MatchPhase::PendingPriorityAssignment {
        let _ = writeln!(out, "  >> tied: assign priority with `priority left|right`");
    }
    if let Some(descriptor) = state.external_match() {
        let _ = writeln!(
            out,
            "  tournament {} round {} match {}",
            descriptor.tournament_id, descriptor.round, descriptor.match_id
        );
    }
    match submission {
        SubmissionStatus::Idle => {}
        SubmissionStatus::Submitting => {
            let _ = writeln!(out, "  submitting result...");
        }
        SubmissionStatus::Submitted { match_id } => {
            let _ = writeln!(out, "  result submitted for {match_id}");
        }
        SubmissionStatus::Failed { message } => {
            let _ = writeln!(out, "  submission failed: {message}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use touche_core::MatchDescriptor;
    use touche_state::Card;

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(180), "3:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn fresh_pool_board() {
        let board = render(&MatchState::default(), &SubmissionStatus::Idle);
        assert!(board.contains("[POOL]"));
        assert!(board.contains("3:00"));
        assert!(board.contains("IDLE"));
        assert!(board.contains("LEFT"));
        assert!(!board.contains("priority"));
    }

    #[test]
    fn names_cards_and_status() {
        let mut state = MatchState::new(MatchFormat::Elimination);
        state.load_external_match(MatchDescriptor {
            match_id: "m-9".to_string(),
            player1: "Kim".to_string(),
            player2: "Ada".to_string(),
            tournament_id: 4,
            round: 3,
            base_uri: String::new(),
            submit_url: "https://t.example/submit".to_string(),
            require_submitter_identity: false,
        });
        state.add_card(Side::Right, Card::Red);

        let board = render(
            &state,
            &SubmissionStatus::Failed {
                message: "timeout".to_string(),
            },
        );
        assert!(board.contains("period 1/3"));
        assert!(board.contains("Kim"));
        assert!(board.contains("Ada"));
        assert!(board.contains("red"));
        assert!(board.contains("match m-9"));
        assert!(board.contains("submission failed: timeout"));
    }

    #[test]
    fn pending_priority_prompt() {
        let mut state = MatchState::new(MatchFormat::FreeForm);
        state.request_priority_assignment();
        let board = render(&state, &SubmissionStatus::Idle);
        assert!(board.contains("PRIORITY"));
        assert!(board.contains("assign priority"));
    }
}
