//! Competitor sides of the piste.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One of the two ends of the piste.
///
/// Sides are physical positions, not people: swapping ends moves each
/// competitor's state to the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The competitor shown on the left (`player1` in tournament payloads).
    Left,
    /// The competitor shown on the right (`player2` in tournament payloads).
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            other => Err(ParseError::UnknownSide(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for side in Side::BOTH {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
        }
    }

    #[test]
    fn test_parse_accepts_short_forms() {
        assert_eq!("L".parse::<Side>().unwrap(), Side::Left);
        assert_eq!(" right ".parse::<Side>().unwrap(), Side::Right);
        assert!(matches!(
            "centre".parse::<Side>(),
            Err(ParseError::UnknownSide(_))
        ));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
        let parsed: Side = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(parsed, Side::Right);
    }
}
