//! Wire types exchanged with the tournament system.

use serde::{Deserialize, Serialize};

/// Body of `POST {baseUri}/api/submitter/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Human-readable name of the person or device submitting results.
    pub name: String,
}

/// Response to a device registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    /// Bearer credential to attach to future submissions.
    pub device_token: String,
}

/// Body of `POST {submitUrl}`.
///
/// Hit counts are keyed on the tournament's `player1`/`player2`, not on the
/// ends of the piste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    /// Tournament match identifier.
    pub match_id: String,
    /// Touches scored by `player1`.
    #[serde(rename = "player1_hits")]
    pub player1_hits: u32,
    /// Touches scored by `player2`.
    #[serde(rename = "player2_hits")]
    pub player2_hits: u32,
    /// Winner's name, or `"tie"`.
    pub winner: String,
    /// Device credential, when the tournament requires submitter identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
}
