use serde::{Deserialize, Serialize};

use crate::elo::Outcome;

/// Rating assumed for a participant whose rating is missing.
pub const DEFAULT_RATING: i32 = 1500;

/// One side of a provider game payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlayer {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    /// Per-side result code ("win", "checkmated", "agreed", ...).
    #[serde(default)]
    pub result: Option<String>,
}

impl RawPlayer {
    pub fn rating_or_default(&self) -> i32 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }
}

/// A game as delivered by the remote archive provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub white: RawPlayer,
    #[serde(default)]
    pub black: RawPlayer,
    #[serde(default)]
    pub time_control: Option<String>,
    #[serde(default)]
    pub time_class: Option<String>,
    /// Epoch seconds.
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub pgn: Option<String>,
    /// Game-level outcome: "White", "Black", anything else is a draw.
    #[serde(default)]
    pub result: Option<String>,
}

impl RawGame {
    /// Split the game-level outcome into (white, black).
    pub fn side_outcomes(&self) -> (Outcome, Outcome) {
        match self.result.as_deref() {
            Some("White") => (Outcome::Win, Outcome::Loss),
            Some("Black") => (Outcome::Loss, Outcome::Win),
            _ => (Outcome::Draw, Outcome::Draw),
        }
    }

    pub fn pgn_or_empty(&self) -> &str {
        self.pgn.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_payload() {
        let game: RawGame = serde_json::from_value(serde_json::json!({
            "url": "https://www.chess.com/game/live/1",
            "pgn": "1. e4 e5 1-0",
            "time_control": "600",
            "end_time": 1_700_000_000,
            "rated": true,
            "time_class": "rapid",
            "white": {"rating": 1600, "result": "win", "@id": "x", "username": "alice"},
            "black": {"rating": 1400, "result": "resigned", "username": "bob"},
            "result": "White"
        }))
        .unwrap();

        assert_eq!(game.white.username.as_deref(), Some("alice"));
        assert_eq!(game.black.rating_or_default(), 1400);
        assert_eq!(game.end_time, Some(1_700_000_000));
        assert_eq!(game.side_outcomes(), (Outcome::Win, Outcome::Loss));
    }

    #[test]
    fn test_missing_optional_fields() {
        let game: RawGame = serde_json::from_value(serde_json::json!({
            "url": "u",
            "white": {"username": "a"},
            "black": {"username": "b"},
            "end_time": 1
        }))
        .unwrap();

        assert_eq!(game.white.rating_or_default(), DEFAULT_RATING);
        assert!(game.time_control.is_none());
        assert_eq!(game.pgn_or_empty(), "");
        assert_eq!(game.side_outcomes(), (Outcome::Draw, Outcome::Draw));
    }

    #[test]
    fn test_black_win_split() {
        let game = RawGame {
            result: Some("Black".into()),
            ..Default::default()
        };
        assert_eq!(game.side_outcomes(), (Outcome::Loss, Outcome::Win));
    }
}
