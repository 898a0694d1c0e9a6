//! Single-game Elo delta estimate.

use serde::{Deserialize, Serialize};

/// Fixed K-factor.
pub const K_FACTOR: f64 = 32.0;

/// One side's outcome of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// `"win"` and `"draw"` map to themselves; anything else is a loss.
    pub fn from_token(token: &str) -> Self {
        match token {
            "win" => Outcome::Win,
            "draw" => Outcome::Draw,
            _ => Outcome::Loss,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Draw => "draw",
            Outcome::Loss => "loss",
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss => 0.0,
        }
    }
}

/// Expected score of `rating` against `opponent_rating`.
pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    let diff = (f64::from(opponent_rating) - f64::from(rating)) / 400.0;
    1.0 / (1.0 + 10f64.powf(diff))
}

/// Rating change for the subject side: `K * (actual - expected)`.
pub fn elo_delta(rating: i32, opponent_rating: i32, outcome: Outcome) -> f64 {
    K_FACTOR * (outcome.score() - expected_score(rating, opponent_rating))
}
