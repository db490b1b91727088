//! # Match State Machine
//!
//! [`MatchState`] is the single authoritative record of a match in progress.
//! Every operator action and every clock tick is a method on it; each method
//! runs to completion and leaves the state consistent.
//!
//! ## Clock expiry
//!
//! When the clock reaches zero the following rules are checked in order and
//! the first match wins (see [`MatchState::on_clock_expired`]):
//!
//! ```text
//! 1. overtime                         → stop (priority decides a tie)
//! 2. team      ─ bout 9 and tied      → pending priority
//!              └ otherwise            → stop, operator advances the bout
//! 3. elimination, period < 3
//!              ─ on a period          → break (60s)
//!              └ on a break           → next period (180s)
//! 4. tied, elimination or freeform    → pending priority
//! 5. otherwise                        → stop
//! ```
//!
//! ## Score bounds
//!
//! [`MatchState::change_score`] writes the value it is given. The bounded
//! operations are [`MatchState::increment_score`] and
//! [`MatchState::decrement_score`], which keep the score within
//! `0..=max_score`.

use serde::{Deserialize, Serialize};

use touche_core::{
    MatchDescriptor, MatchFormat, Side, ELIMINATION_PERIODS, OVERTIME_SECONDS, TEAM_BOUTS,
};

use crate::cards::{Card, CardChange, PassivityCard, PassivityLadder};
use crate::competitor::CompetitorState;

/// Outcome of one clock expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Overtime ran out; priority decides a tie.
    OvertimeEnded,
    /// A team bout ended; the operator advances to the next bout.
    BoutEnded {
        /// The bout that ended.
        bout: u32,
    },
    /// An elimination period ended and the break started.
    BreakStarted {
        /// The period that ended.
        period: u32,
    },
    /// A break ended and the next elimination period is ready.
    PeriodStarted {
        /// The new period.
        period: u32,
    },
    /// Regulation ended tied; the operator must assign priority.
    PriorityPending,
    /// Regulation ended with no further segment.
    MatchEnded,
}

/// Outcome of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The clock was stopped or already at zero.
    Ignored,
    /// One second elapsed; the clock is still above zero.
    Counted {
        /// Seconds left after the tick.
        remaining: u32,
    },
    /// The tick brought the clock to zero.
    Expired(Expiry),
}

/// The match in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    format: MatchFormat,
    left: CompetitorState,
    right: CompetitorState,
    passivity: PassivityLadder,
    time_remaining_seconds: u32,
    is_running: bool,
    current_period: u32,
    max_time_seconds: u32,
    max_score: u32,
    is_break: bool,
    is_overtime: bool,
    priority_side: Option<Side>,
    pending_priority_assignment: bool,
    external_match: Option<MatchDescriptor>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(MatchFormat::Pool)
    }
}

impl MatchState {
    /// A fresh match of `format`, stopped at full regulation time.
    pub fn new(format: MatchFormat) -> Self {
        let cfg = format.config(1);
        Self {
            format,
            left: CompetitorState::new(Side::Left),
            right: CompetitorState::new(Side::Right),
            passivity: PassivityLadder::new(),
            time_remaining_seconds: cfg.max_time_seconds,
            is_running: false,
            current_period: 1,
            max_time_seconds: cfg.max_time_seconds,
            max_score: cfg.max_score,
            is_break: false,
            is_overtime: false,
            priority_side: None,
            pending_priority_assignment: false,
            external_match: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Format being fenced.
    pub fn format(&self) -> MatchFormat {
        self.format
    }

    /// Competitor currently on `side`.
    pub fn competitor(&self, side: Side) -> &CompetitorState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Score of the competitor currently on `side`.
    pub fn score(&self, side: Side) -> u32 {
        self.competitor(side).score
    }

    /// Joint passivity cards. Both competitors see the same ladder.
    pub fn passivity(&self) -> &PassivityLadder {
        &self.passivity
    }

    /// Seconds left on the clock.
    pub fn time_remaining_seconds(&self) -> u32 {
        self.time_remaining_seconds
    }

    /// Whether the clock is running.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Period (elimination) or bout (team); always 1 otherwise.
    pub fn current_period(&self) -> u32 {
        self.current_period
    }

    /// Regulation time of the current segment.
    pub fn max_time_seconds(&self) -> u32 {
        self.max_time_seconds
    }

    /// Score cap of the current segment.
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    /// Number of periods or bouts in this format.
    pub fn total_periods(&self) -> u32 {
        self.format.config(self.current_period).total_periods
    }

    /// Whether an elimination break is on the clock.
    pub fn is_break(&self) -> bool {
        self.is_break
    }

    /// Whether the overtime segment has begun.
    pub fn is_overtime(&self) -> bool {
        self.is_overtime
    }

    /// Side holding priority, if assigned.
    pub fn priority_side(&self) -> Option<Side> {
        self.priority_side
    }

    /// Whether the operator is being asked to assign priority.
    pub fn pending_priority_assignment(&self) -> bool {
        self.pending_priority_assignment
    }

    /// Tournament identity, if the match was loaded from a QR code.
    pub fn external_match(&self) -> Option<&MatchDescriptor> {
        self.external_match.as_ref()
    }

    /// Whether both competitors have the same score.
    pub fn scores_tied(&self) -> bool {
        self.left.score == self.right.score
    }

    /// Whether overtime has been fenced to the end of its clock.
    pub fn overtime_concluded(&self) -> bool {
        self.is_overtime && self.time_remaining_seconds == 0 && !self.is_running
    }

    fn competitor_mut(&mut self, side: Side) -> &mut CompetitorState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Start the clock if stopped, stop it if running.
    pub fn start_pause(&mut self) {
        self.is_running = !self.is_running;
        tracing::debug!(
            running = self.is_running,
            remaining = self.time_remaining_seconds,
            "clock toggled"
        );
    }

    /// Advance the clock by one second.
    ///
    /// Ignored unless the clock is running with time left. Reaching zero stops
    /// the clock and applies [`MatchState::on_clock_expired`].
    pub fn tick(&mut self) -> Tick {
        if !self.is_running || self.time_remaining_seconds == 0 {
            return Tick::Ignored;
        }
        self.time_remaining_seconds -= 1;
        if self.time_remaining_seconds > 0 {
            return Tick::Counted {
                remaining: self.time_remaining_seconds,
            };
        }
        Tick::Expired(self.on_clock_expired())
    }

    /// Apply the end-of-clock rules. Always leaves the clock stopped.
    pub fn on_clock_expired(&mut self) -> Expiry {
        self.is_running = false;
        let tied = self.scores_tied();

        let expiry = if self.is_overtime {
            Expiry::OvertimeEnded
        } else {
            match self.format {
                MatchFormat::Team if self.current_period == TEAM_BOUTS && tied => {
                    self.pending_priority_assignment = true;
                    Expiry::PriorityPending
                }
                MatchFormat::Team if self.current_period == TEAM_BOUTS => Expiry::MatchEnded,
                MatchFormat::Team => Expiry::BoutEnded {
                    bout: self.current_period,
                },
                MatchFormat::Elimination if self.current_period < ELIMINATION_PERIODS => {
                    self.advance_elimination_segment()
                }
                MatchFormat::Elimination | MatchFormat::FreeForm if tied => {
                    self.pending_priority_assignment = true;
                    Expiry::PriorityPending
                }
                MatchFormat::Pool | MatchFormat::Elimination | MatchFormat::FreeForm => {
                    Expiry::MatchEnded
                }
            }
        };

        tracing::info!(
            format = %self.format,
            period = self.current_period,
            left = self.left.score,
            right = self.right.score,
            ?expiry,
            "clock expired"
        );
        expiry
    }

    fn advance_elimination_segment(&mut self) -> Expiry {
        let cfg = self.format.config(self.current_period);
        if self.is_break {
            self.is_break = false;
            self.current_period += 1;
            self.time_remaining_seconds = cfg.max_time_seconds;
            Expiry::PeriodStarted {
                period: self.current_period,
            }
        } else {
            self.is_break = true;
            self.time_remaining_seconds = cfg.break_seconds.unwrap_or_default();
            Expiry::BreakStarted {
                period: self.current_period,
            }
        }
    }

    /// Set the clock directly. The caller keeps the value non-negative.
    pub fn change_time(&mut self, seconds: u32) {
        self.time_remaining_seconds = seconds;
        tracing::debug!(seconds, "clock set");
    }

    /// Step the minutes digit of the clock, wrapping within `0..=9`.
    pub fn adjust_minutes(&mut self, increment: bool) {
        let minutes = self.time_remaining_seconds / 60;
        let seconds = self.time_remaining_seconds % 60;
        let minutes = if increment {
            (minutes + 1) % 10
        } else if minutes == 0 {
            9
        } else {
            minutes - 1
        };
        self.change_time(minutes * 60 + seconds);
    }

    /// Step the seconds digits of the clock, wrapping within `0..=59`.
    pub fn adjust_seconds(&mut self, increment: bool) {
        let minutes = self.time_remaining_seconds / 60;
        let seconds = self.time_remaining_seconds % 60;
        let seconds = if increment {
            (seconds + 1) % 60
        } else if seconds == 0 {
            59
        } else {
            seconds - 1
        };
        self.change_time(minutes * 60 + seconds);
    }

    // ── Scoring ──────────────────────────────────────────────────────

    /// Set the score on `side` to `score` exactly. Not bounded; see
    /// [`MatchState::increment_score`] for the bounded form.
    pub fn change_score(&mut self, side: Side, score: u32) {
        self.competitor_mut(side).score = score;
        tracing::debug!(%side, score, "score set");
    }

    /// Add a touch to `side` unless it is already at the score cap.
    pub fn increment_score(&mut self, side: Side) -> bool {
        let score = self.score(side);
        if score >= self.max_score {
            return false;
        }
        self.change_score(side, score + 1);
        true
    }

    /// Remove a touch from `side` unless it is already at zero.
    pub fn decrement_score(&mut self, side: Side) -> bool {
        let score = self.score(side);
        if score == 0 {
            return false;
        }
        self.change_score(side, score - 1);
        true
    }

    // ── Cards ────────────────────────────────────────────────────────

    /// Issue `card` to `side`: yellow toggles, red appends.
    pub fn add_card(&mut self, side: Side, card: Card) -> CardChange {
        let change = self.competitor_mut(side).cards.apply(card);
        tracing::info!(%side, %card, ?change, "card");
        change
    }

    /// Toggle a joint passivity card. Ignored outside elimination and team.
    pub fn set_passivity_card(&mut self, card: PassivityCard) -> CardChange {
        if !self.format.allows_passivity() {
            return CardChange::Ignored;
        }
        let change = self.passivity.toggle(card);
        tracing::info!(%card, ?change, "passivity card");
        change
    }

    // ── Resets ───────────────────────────────────────────────────────

    /// Switch format and start over with that format's defaults.
    pub fn change_format(&mut self, format: MatchFormat) {
        self.format = format;
        self.reinitialize();
        tracing::info!(%format, "match format changed");
    }

    /// Rewind the clock to the start of the current segment type.
    ///
    /// In overtime the clock goes back to the overtime length and the period
    /// is kept; otherwise it goes back to regulation time of period/bout 1.
    /// The score cap is left alone.
    pub fn reset_time(&mut self) {
        self.is_running = false;
        self.is_break = false;
        if self.is_overtime {
            self.time_remaining_seconds = OVERTIME_SECONDS;
        } else {
            self.current_period = 1;
            self.time_remaining_seconds = self.max_time_seconds;
        }
    }

    /// Zero both scores.
    pub fn reset_score(&mut self) {
        self.left.score = 0;
        self.right.score = 0;
    }

    /// Withdraw every card, including the passivity ladder.
    pub fn reset_cards(&mut self) {
        self.left.cards.clear();
        self.right.cards.clear();
        self.passivity.clear();
    }

    /// Start over with the current format's defaults.
    pub fn reset_all(&mut self) {
        self.reinitialize();
        tracing::info!(format = %self.format, "match reset");
    }

    fn reinitialize(&mut self) {
        let cfg = self.format.config(1);
        self.left.reset_scoring();
        self.right.reset_scoring();
        self.passivity.clear();
        self.current_period = 1;
        self.max_time_seconds = cfg.max_time_seconds;
        self.max_score = cfg.max_score;
        self.time_remaining_seconds = cfg.max_time_seconds;
        self.is_running = false;
        self.is_break = false;
        self.is_overtime = false;
        self.priority_side = None;
        self.pending_priority_assignment = false;
    }

    // ── Sides and priority ───────────────────────────────────────────

    /// Competitors change ends. Priority follows its holder.
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
        self.priority_side = self.priority_side.map(Side::opposite);
    }

    /// Give priority to `side` and set up the overtime segment.
    pub fn assign_priority(&mut self, side: Side) {
        self.priority_side = Some(side);
        self.is_overtime = true;
        self.is_running = false;
        self.time_remaining_seconds = OVERTIME_SECONDS;
        self.pending_priority_assignment = false;
        tracing::info!(%side, "priority assigned, overtime ready");
    }

    /// Ask the operator to assign priority outside the automatic tie flow.
    /// Only free-form matches allow this.
    pub fn request_priority_assignment(&mut self) -> bool {
        if !self.format.allows_manual_priority() {
            return false;
        }
        self.pending_priority_assignment = true;
        true
    }

    /// Close the priority prompt without assigning.
    pub fn dismiss_priority_assignment(&mut self) {
        self.pending_priority_assignment = false;
    }

    // ── Team relay ───────────────────────────────────────────────────

    /// Move a team relay to its next bout.
    ///
    /// Score cap grows to the next bout's cumulative cap and the clock is
    /// rewound. Yellow/red cards are per bout; passivity carries over.
    pub fn advance_bout(&mut self) -> bool {
        if self.format != MatchFormat::Team || self.current_period >= TEAM_BOUTS {
            return false;
        }
        self.current_period += 1;
        let cfg = self.format.config(self.current_period);
        self.max_score = cfg.max_score;
        self.max_time_seconds = cfg.max_time_seconds;
        self.time_remaining_seconds = cfg.max_time_seconds;
        self.is_running = false;
        self.left.cards.clear();
        self.right.cards.clear();
        self.is_overtime = false;
        self.priority_side = None;
        tracing::info!(bout = self.current_period, max_score = self.max_score, "next bout");
        true
    }

    // ── Tournament identity ──────────────────────────────────────────

    /// Load a tournament match: names come from the descriptor and the
    /// current format starts over.
    pub fn load_external_match(&mut self, descriptor: MatchDescriptor) {
        self.left = CompetitorState::new(Side::Left);
        self.right = CompetitorState::new(Side::Right);
        self.left.display_name = Some(descriptor.player1.clone());
        self.right.display_name = Some(descriptor.player2.clone());
        tracing::info!(
            match_id = %descriptor.match_id,
            tournament_id = descriptor.tournament_id,
            round = descriptor.round,
            "tournament match loaded"
        );
        self.external_match = Some(descriptor);
        self.reinitialize();
    }

    /// Forget the tournament match and its competitor names.
    pub fn clear_external_match(&mut self) {
        self.external_match = None;
        self.left.display_name = None;
        self.right.display_name = None;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
