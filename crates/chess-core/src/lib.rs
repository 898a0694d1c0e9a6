//! Chess-rules-aware core: movetext cleanup, replay, canonical position keys,
//! frequency mining and rating arithmetic. Everything here is synchronous and
//! free of I/O.

pub mod config;
pub mod elo;
pub mod error;
pub mod fingerprint;
pub mod game_data;
pub mod opening;
pub mod pgn;
pub mod positions;
pub mod replay;

pub use config::MiningConfig;
pub use elo::{elo_delta, Outcome};
pub use error::ReplayError;
pub use fingerprint::{Fingerprint, Observation};
pub use game_data::{RawGame, RawPlayer};
pub use positions::{PositionCounter, PositionStat};
pub use replay::{Ply, Replayer};
