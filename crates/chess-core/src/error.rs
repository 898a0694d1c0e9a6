//! Replay error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The token is not SAN at all (NAG debris, variation brackets, garbage).
    #[error("Unparseable move '{token}' at ply {ply}")]
    Parse { ply: usize, token: String },

    /// The token is SAN, but no legal move in the current position matches it.
    #[error("Illegal move '{token}' at ply {ply}")]
    IllegalMove { ply: usize, token: String },

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
}
