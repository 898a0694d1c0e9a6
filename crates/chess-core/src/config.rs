use serde::{Deserialize, Serialize};

/// Thresholds for surfacing recurring positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Minimum occurrences for a position to appear in the top-N ranking.
    pub min_occurrences: u32,

    /// Size of the top-N ranking.
    pub top_n: usize,

    /// Minimum ply depth for the filtered view.
    pub min_depth: usize,

    /// Minimum occurrences for the filtered view.
    pub min_count: u32,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 3,
            top_n: 10,
            min_depth: 5,
            min_count: 3,
        }
    }
}
