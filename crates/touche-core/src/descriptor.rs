//! # Match Descriptor
//!
//! Identity of a tournament match, delivered as JSON inside a QR code:
//!
//! ```json
//! {
//!   "matchId": "m-17", "player1": "Kim", "player2": "Rossi",
//!   "tournamentId": 4, "round": 2,
//!   "baseUri": "https://tournament.example",
//!   "submitUrl": "https://tournament.example/api/matches/m-17/result",
//!   "requireSubmitterIdentity": true
//! }
//! ```
//!
//! `matchId`, `player1`, `player2`, `tournamentId`, `round` and `submitUrl`
//! are required. Empty strings and zero ids count as missing, matching what
//! the tournament system itself treats as unset. `baseUri` is only needed for
//! device registration and defaults to empty.

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;
use crate::side::Side;

/// A validated tournament match identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDescriptor {
    /// Tournament-side match identifier.
    pub match_id: String,
    /// Competitor fencing on the left.
    pub player1: String,
    /// Competitor fencing on the right.
    pub player2: String,
    /// Tournament the match belongs to.
    pub tournament_id: u64,
    /// Round number within the tournament.
    pub round: u32,
    /// Root of the tournament API, used for device registration.
    #[serde(default)]
    pub base_uri: String,
    /// Endpoint that accepts the match result.
    pub submit_url: String,
    /// Whether submissions must carry the device credential.
    #[serde(default)]
    pub require_submitter_identity: bool,
}

/// Wire shape before validation; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    match_id: Option<String>,
    player1: Option<String>,
    player2: Option<String>,
    tournament_id: Option<u64>,
    round: Option<u32>,
    base_uri: Option<String>,
    submit_url: Option<String>,
    require_submitter_identity: Option<bool>,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, DescriptorError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DescriptorError::MissingField { field }),
    }
}

fn required_id<T: Default + PartialEq>(
    value: Option<T>,
    field: &'static str,
) -> Result<T, DescriptorError> {
    match value {
        Some(v) if v != T::default() => Ok(v),
        _ => Err(DescriptorError::MissingField { field }),
    }
}

impl MatchDescriptor {
    /// Parse and validate a decoded QR payload.
    pub fn from_json(payload: &str) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor = serde_json::from_str(payload)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDescriptor) -> Result<Self, DescriptorError> {
        Ok(Self {
            match_id: required_text(raw.match_id, "matchId")?,
            player1: required_text(raw.player1, "player1")?,
            player2: required_text(raw.player2, "player2")?,
            tournament_id: required_id(raw.tournament_id, "tournamentId")?,
            round: required_id(raw.round, "round")?,
            base_uri: raw.base_uri.unwrap_or_default(),
            submit_url: required_text(raw.submit_url, "submitUrl")?,
            require_submitter_identity: raw.require_submitter_identity.unwrap_or(false),
        })
    }

    /// Name of the competitor who started the match on `side`.
    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.player1,
            Side::Right => &self.player2,
        }
    }
}
