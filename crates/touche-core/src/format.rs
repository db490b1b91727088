//! # Match Configuration Catalog
//!
//! Static per-format parameters: regulation time, score cap, break length and
//! the number of scored segments. A segment is a period for
//! [`MatchFormat::Elimination`] and a bout for [`MatchFormat::Team`]; the
//! other formats have a single segment.
//!
//! | Format      | Time/segment | Score cap   | Break | Segments |
//! |-------------|--------------|-------------|-------|----------|
//! | Pool        | 180s         | 5           | -     | 1        |
//! | Elimination | 180s         | 15          | 60s   | 3        |
//! | Team        | 180s         | 5 × bout    | -     | 9        |
//! | FreeForm    | 180s         | 999         | -     | 1        |
//!
//! Overtime is format-independent: one 60s segment with the score cap
//! unchanged.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Regulation time of one period or bout, in seconds.
pub const REGULATION_SECONDS: u32 = 180;

/// Break between elimination periods, in seconds.
pub const BREAK_SECONDS: u32 = 60;

/// Length of the single overtime segment, in seconds.
pub const OVERTIME_SECONDS: u32 = 60;

/// Number of periods in an elimination bout.
pub const ELIMINATION_PERIODS: u32 = 3;

/// Number of bouts in a team relay.
pub const TEAM_BOUTS: u32 = 9;

/// Score cap for free-form fencing. Effectively unbounded.
pub const FREEFORM_SCORE_CAP: u32 = 999;

const POOL_SCORE_CAP: u32 = 5;
const ELIMINATION_SCORE_CAP: u32 = 15;
const TEAM_SCORE_STEP: u32 = 5;

/// Cumulative score cap of a team relay after bout `bout` (`5 × bout`).
pub fn max_score_for_bout(bout: u32) -> u32 {
    TEAM_SCORE_STEP * bout
}

/// Parameters for one segment of a match format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Regulation time of the segment.
    pub max_time_seconds: u32,
    /// Score at which the segment (or match) is won.
    pub max_score: u32,
    /// Break that follows a non-final segment, if the format has breaks.
    pub break_seconds: Option<u32>,
    /// Number of scored segments in the match.
    pub total_periods: u32,
}

/// The match format being fenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    /// Pool bout: one period to 5 touches.
    Pool,
    /// Direct elimination: three periods to 15 touches with breaks.
    Elimination,
    /// Team relay: nine bouts with a cumulative cap of 5 per bout.
    Team,
    /// Training or free fencing with no practical cap.
    FreeForm,
}

impl MatchFormat {
    /// Every format, in menu order.
    pub const ALL: [MatchFormat; 4] = [
        MatchFormat::Pool,
        MatchFormat::Elimination,
        MatchFormat::Team,
        MatchFormat::FreeForm,
    ];

    /// Catalog entry for `segment` (period or bout number, 1-based).
    ///
    /// Only [`MatchFormat::Team`] depends on the segment; bout numbers are
    /// clamped into `1..=9` so the lookup stays total.
    pub fn config(self, segment: u32) -> FormatConfig {
        match self {
            Self::Pool => FormatConfig {
                max_time_seconds: REGULATION_SECONDS,
                max_score: POOL_SCORE_CAP,
                break_seconds: None,
                total_periods: 1,
            },
            Self::Elimination => FormatConfig {
                max_time_seconds: REGULATION_SECONDS,
                max_score: ELIMINATION_SCORE_CAP,
                break_seconds: Some(BREAK_SECONDS),
                total_periods: ELIMINATION_PERIODS,
            },
            Self::Team => FormatConfig {
                max_time_seconds: REGULATION_SECONDS,
                max_score: max_score_for_bout(segment.clamp(1, TEAM_BOUTS)),
                break_seconds: None,
                total_periods: TEAM_BOUTS,
            },
            Self::FreeForm => FormatConfig {
                max_time_seconds: REGULATION_SECONDS,
                max_score: FREEFORM_SCORE_CAP,
                break_seconds: None,
                total_periods: 1,
            },
        }
    }

    /// Whether the joint passivity card ladder may be used.
    pub fn allows_passivity(self) -> bool {
        matches!(self, Self::Elimination | Self::Team)
    }

    /// Whether the operator may open the priority prompt by hand.
    pub fn allows_manual_priority(self) -> bool {
        matches!(self, Self::FreeForm)
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pool => "pool",
            Self::Elimination => "elimination",
            Self::Team => "team",
            Self::FreeForm => "freeform",
        }
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pool" => Ok(Self::Pool),
            "elimination" | "de" => Ok(Self::Elimination),
            "team" => Ok(Self::Team),
            "freeform" | "free" => Ok(Self::FreeForm),
            other => Err(ParseError::UnknownFormat(other.to_string())),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
