//! Canonical position keys: piece placement plus side to move.
//!
//! Castling rights, the en-passant square and both move counters are dropped,
//! so transpositions from different games collapse onto the same key. Because
//! the full-move number is gone, depth can never be recovered from a key; it
//! travels alongside as [`Observation::ply`].

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::{fen::Fen, CastlingMode, Chess, Color, EnPassantMode, Position};

use crate::error::ReplayError;
use crate::replay::Ply;

const SEPARATOR: &str = " ";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Canonicalize a board state.
    pub fn of(pos: &Chess) -> Self {
        let fen = Fen::from_position(pos, EnPassantMode::Legal).to_string();
        Self(fen.split_whitespace().take(2).collect::<Vec<_>>().join(SEPARATOR))
    }

    /// Canonicalize a full FEN string. The position must be legal.
    pub fn from_fen(fen: &str) -> Result<Self, ReplayError> {
        let fen = Fen::from_ascii(fen.as_bytes())
            .map_err(|e| ReplayError::InvalidFen(e.to_string()))?;
        let pos: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| ReplayError::InvalidFen(e.to_string()))?;
        Ok(Self::of(&pos))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The board layout field, e.g. `rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR`.
    pub fn placement(&self) -> &str {
        self.0.split(SEPARATOR).next().unwrap_or_default()
    }

    pub fn side_to_move(&self) -> Color {
        match self.0.split(SEPARATOR).nth(1) {
            Some("b") => Color::Black,
            _ => Color::White,
        }
    }

    /// Expand back into a loadable FEN for board renderers.
    ///
    /// Castling and en-passant are unknown and written as `-`; the move
    /// counters are placeholders and say nothing about game depth.
    pub fn to_fen(&self) -> String {
        format!("{} - - 0 1", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fingerprint with whatever depth information came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub fingerprint: Fingerprint,
    /// Plies applied since the game start; `None` when the key arrived without
    /// replay context.
    pub ply: Option<usize>,
}

impl Observation {
    pub fn from_ply(ply: &Ply) -> Self {
        Self {
            fingerprint: Fingerprint::of(&ply.position),
            ply: Some(ply.number),
        }
    }

    pub fn without_depth(fingerprint: Fingerprint) -> Self {
        Self { fingerprint, ply: None }
    }

    pub fn depth(&self) -> Option<usize> {
        self.ply
    }
}
