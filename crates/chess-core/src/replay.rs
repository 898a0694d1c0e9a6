//! Deterministic replay of a SAN move list from the standard starting position.

use std::iter::FusedIterator;

use shakmaty::{san::SanPlus, Chess, Position};

use crate::error::ReplayError;
use crate::pgn;

/// Board state after one half-move.
#[derive(Debug, Clone)]
pub struct Ply {
    /// 1-based ply count since the start of the game.
    pub number: usize,
    pub san: String,
    pub position: Chess,
}

/// Apply one SAN token to `pos`, returning the resulting position.
///
/// Trailing `!`/`?` annotations are tolerated, as are `+`/`#` suffixes.
pub fn apply_san(pos: &Chess, token: &str, ply: usize) -> Result<Chess, ReplayError> {
    let cleaned = token.trim_end_matches(|c: char| c == '!' || c == '?');

    let san_plus: SanPlus = cleaned.parse().map_err(|_| ReplayError::Parse {
        ply,
        token: token.to_string(),
    })?;

    let mv = san_plus
        .san
        .to_move(pos)
        .map_err(|_| ReplayError::IllegalMove {
            ply,
            token: token.to_string(),
        })?;

    let mut next = pos.clone();
    next.play_unchecked(mv);
    Ok(next)
}

/// Lazily replays a move sequence, yielding one [`Ply`] per applied move.
///
/// The sequence is finite and cannot be restarted. After the first error the
/// replayer is exhausted; callers that need the states twice should collect
/// them (see [`replay_all`]).
pub struct Replayer<I> {
    tokens: I,
    pos: Chess,
    ply: usize,
    finished: bool,
}

impl<I> Replayer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            pos: Chess::default(),
            ply: 0,
            finished: false,
        }
    }

    /// Number of plies applied so far.
    pub fn plies_applied(&self) -> usize {
        self.ply
    }
}

impl<I> Iterator for Replayer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Ply, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let Some(token) = self.tokens.next() else {
                self.finished = true;
                return None;
            };
            let token = token.as_ref();

            // NAGs carry no move; "*" marks an unfinished game.
            if token.starts_with('$') {
                continue;
            }
            if token == "*" {
                self.finished = true;
                return None;
            }

            let ply = self.ply + 1;
            return match apply_san(&self.pos, token, ply) {
                Ok(next) => {
                    self.pos = next;
                    self.ply = ply;
                    Some(Ok(Ply {
                        number: ply,
                        san: token.to_string(),
                        position: self.pos.clone(),
                    }))
                }
                Err(e) => {
                    self.finished = true;
                    Some(Err(e))
                }
            };
        }
    }
}

impl<I> FusedIterator for Replayer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
}

/// Sanitize a raw PGN and replay its moves.
pub fn replay_pgn(pgn_text: &str) -> Replayer<std::vec::IntoIter<String>> {
    Replayer::new(pgn::move_tokens(pgn_text))
}

/// Replay eagerly. Any failure discards the whole game.
pub fn replay_all<I>(tokens: I) -> Result<Vec<Ply>, ReplayError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Replayer::new(tokens).collect()
}
