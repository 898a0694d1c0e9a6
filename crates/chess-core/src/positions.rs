//! Frequency aggregation of position fingerprints across a corpus of games.
//!
//! A [`PositionCounter`] is built fresh for every analysis run and handed to
//! whoever needs the results; there is no shared counter.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::config::MiningConfig;
use crate::error::ReplayError;
use crate::fingerprint::{Fingerprint, Observation};
use crate::pgn;
use crate::replay::Replayer;

/// Aggregate for one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionStat {
    pub fingerprint: Fingerprint,
    pub count: u32,
    /// Shallowest ply at which the position was reached, if known.
    pub depth: Option<usize>,
}

#[derive(Debug, Clone)]
struct Entry {
    count: u32,
    first_seen: usize,
    /// Occurrences per known ply.
    by_ply: BTreeMap<usize, u32>,
}

impl Entry {
    fn shallowest(&self) -> Option<usize> {
        self.by_ply.keys().next().copied()
    }

    /// Occurrences at `min_depth` or deeper, and the shallowest such ply.
    fn at_depth(&self, min_depth: usize) -> (u32, Option<usize>) {
        let deep = self.by_ply.range(min_depth..);
        let first = deep.clone().next().map(|(ply, _)| *ply);
        (deep.map(|(_, n)| n).sum(), first)
    }
}

#[derive(Debug, Default)]
pub struct PositionCounter {
    entries: HashMap<Fingerprint, Entry>,
    games_recorded: usize,
    games_skipped: usize,
}

impl PositionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every position of every game in `pgns`. Games that fail to
    /// replay are skipped.
    pub fn from_pgns<'a>(pgns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counter = Self::new();
        for pgn_text in pgns {
            // Result already tallied in games_skipped.
            let _ = counter.record_pgn(pgn_text);
        }
        counter
    }

    /// Record one observation.
    pub fn observe(&mut self, obs: Observation) {
        let next_index = self.entries.len();
        let entry = self.entries.entry(obs.fingerprint).or_insert(Entry {
            count: 0,
            first_seen: next_index,
            by_ply: BTreeMap::new(),
        });
        entry.count += 1;
        if let Some(ply) = obs.ply {
            *entry.by_ply.entry(ply).or_insert(0) += 1;
        }
    }

    /// Replay a move list and count every resulting position.
    ///
    /// The game is replayed in full before anything is counted, so an
    /// illegal move anywhere leaves the counter untouched.
    pub fn record_game<I>(&mut self, tokens: I) -> Result<usize, ReplayError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut replayer = Replayer::new(tokens);
        let mut plies = Vec::new();
        while let Some(step) = replayer.next() {
            match step {
                Ok(ply) => plies.push(ply),
                Err(e) => {
                    debug!(
                        error = %e,
                        replayed = replayer.plies_applied(),
                        "Skipping game that failed to replay"
                    );
                    self.games_skipped += 1;
                    return Err(e);
                }
            }
        }

        let n = plies.len();
        for ply in &plies {
            self.observe(Observation::from_ply(ply));
        }
        self.games_recorded += 1;
        Ok(n)
    }

    /// Sanitize a raw PGN and record it.
    pub fn record_pgn(&mut self, pgn_text: &str) -> Result<usize, ReplayError> {
        self.record_game(pgn::move_tokens(pgn_text))
    }

    pub fn count(&self, fingerprint: &Fingerprint) -> u32 {
        self.entries.get(fingerprint).map(|e| e.count).unwrap_or(0)
    }

    /// Number of distinct fingerprints seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn games_recorded(&self) -> usize {
        self.games_recorded
    }

    pub fn games_skipped(&self) -> usize {
        self.games_skipped
    }

    fn ordered_entries(&self) -> Vec<(&Fingerprint, &Entry)> {
        let mut entries: Vec<(&Fingerprint, &Entry)> = self.entries.iter().collect();
        entries.sort_by_key(|(_, e)| e.first_seen);
        entries
    }

    /// All stats in first-encountered order. `depth` is the shallowest ply seen.
    pub fn stats(&self) -> Vec<PositionStat> {
        self.ordered_entries()
            .into_iter()
            .map(|(fp, e)| PositionStat {
                fingerprint: fp.clone(),
                count: e.count,
                depth: e.shallowest(),
            })
            .collect()
    }

    /// Top `top_n` fingerprints by count (ties by first-encountered order),
    /// keeping only those seen at least `min_occurrences` times.
    pub fn most_common(&self, min_occurrences: u32, top_n: usize) -> Vec<PositionStat> {
        let mut stats = self.stats();
        // Stable sort keeps first-seen order within equal counts.
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
            .into_iter()
            .take(top_n)
            .filter(|s| s.count >= min_occurrences)
            .collect()
    }

    /// Fingerprints reached at ply depth >= `min_depth` at least `min_count`
    /// times.
    ///
    /// Depth is judged per occurrence: `count` only includes occurrences at
    /// `min_depth` or deeper, and `depth` is the shallowest of those. When
    /// `min_depth > 0`, occurrences without a known depth are ignored.
    pub fn filter(&self, min_depth: usize, min_count: u32) -> Vec<PositionStat> {
        self.ordered_entries()
            .into_iter()
            .filter_map(|(fp, e)| {
                let (count, depth) = if min_depth == 0 {
                    (e.count, e.shallowest())
                } else {
                    e.at_depth(min_depth)
                };
                (count > 0 && count >= min_count).then(|| PositionStat {
                    fingerprint: fp.clone(),
                    count,
                    depth,
                })
            })
            .collect()
    }

    pub fn ranked(&self, config: &MiningConfig) -> Vec<PositionStat> {
        self.most_common(config.min_occurrences, config.top_n)
    }

    pub fn filtered(&self, config: &MiningConfig) -> Vec<PositionStat> {
        self.filter(config.min_depth, config.min_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::replay_all;
    use shakmaty::Chess;

    fn fp_after(moves: &[&str]) -> Fingerprint {
        let plies = replay_all(moves).unwrap();
        Fingerprint::of(&plies.last().unwrap().position)
    }

    #[test]
    fn test_counts_across_games() {
        let counter = PositionCounter::from_pgns([
            "1. e4 e5 2. Nf3",
            "1. e4 e5 2. Bc4",
            "1. e4 c5",
        ]);
        assert_eq!(counter.games_recorded(), 3);
        assert_eq!(counter.count(&fp_after(&["e4"])), 3);
        assert_eq!(counter.count(&fp_after(&["e4", "e5"])), 2);
        assert_eq!(counter.count(&fp_after(&["e4", "c5"])), 1);
    }

    #[test]
    fn test_bad_games_skipped_whole() {
        let mut counter = PositionCounter::new();
        assert!(counter.record_pgn("1. e4 e5 2. Ke3").is_err());
        assert!(counter.is_empty());
        assert_eq!(counter.games_skipped(), 1);

        counter.record_pgn("1. d4").unwrap();
        assert_eq!(counter.len(), 1);
    }

    #[test]
    fn test_most_common_ties_break_by_first_seen() {
        let counter = PositionCounter::from_pgns(["1. e4 e5", "1. e4 e5"]);
        let top = counter.most_common(1, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].fingerprint, fp_after(&["e4"]));
        assert_eq!(top[1].fingerprint, fp_after(&["e4", "e5"]));
    }

    #[test]
    fn test_most_common_top_n_then_threshold() {
        let counter = PositionCounter::from_pgns(["1. e4 e5", "1. e4 c5", "1. e4 c5"]);
        let top = counter.most_common(2, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 3);

        let top = counter.most_common(2, 10);
        assert_eq!(top.len(), 2);
        assert!(counter.most_common(4, 10).is_empty());
    }

    #[test]
    fn test_filter_zero_thresholds_returns_everything() {
        let mut counter = PositionCounter::from_pgns(["1. e4 e5 2. Nf3 Nc6", "1. d4"]);
        counter.observe(Observation::without_depth(Fingerprint::of(&Chess::default())));
        assert_eq!(counter.filter(0, 0).len(), counter.len());
    }

    #[test]
    fn test_filter_count_above_max_is_empty() {
        let counter = PositionCounter::from_pgns(["1. e4 e5", "1. e4"]);
        assert!(counter.filter(0, 3).is_empty());
    }

    #[test]
    fn test_filter_uses_ply_depth() {
        let counter = PositionCounter::from_pgns([
            "1. e4 e5 2. Nf3 Nc6 3. Bb5",
            "1. e4 e5 2. Nf3 Nc6 3. Bb5",
        ]);
        let deep = counter.filter(4, 2);
        assert_eq!(deep.len(), 2);
        assert_eq!(deep[0].depth, Some(4));
        assert_eq!(deep[1].depth, Some(5));
    }

    #[test]
    fn test_filter_excludes_unknown_depth() {
        let mut counter = PositionCounter::new();
        let fp = fp_after(&["e4", "e5", "Nf3"]);
        for _ in 0..5 {
            counter.observe(Observation::without_depth(fp.clone()));
        }
        assert!(counter.filter(1, 1).is_empty());
        assert_eq!(counter.filter(0, 1).len(), 1);
    }

    #[test]
    fn test_depth_is_shallowest_ply() {
        // Knight shuffle reaches the start position again at ply 4.
        let counter = PositionCounter::from_pgns(["1. Nf3 Nf6 2. Ng1 Ng8 3. e4", "1. e4"]);
        let stats = counter.stats();
        let e4 = stats
            .iter()
            .find(|s| s.fingerprint == fp_after(&["e4"]))
            .unwrap();
        assert_eq!(e4.count, 2);
        assert_eq!(e4.depth, Some(1));
    }

    #[test]
    fn test_filter_counts_only_deep_occurrences() {
        let counter = PositionCounter::from_pgns([
            "1. Nf3 Nf6 2. Ng1 Ng8 3. e4",
            "1. Nf3 Nf6 2. Ng1 Ng8 3. e4",
            "1. e4",
        ]);
        let e4 = fp_after(&["e4"]);
        assert_eq!(counter.count(&e4), 3);

        let deep = counter.filter(5, 1);
        let stat = deep.iter().find(|s| s.fingerprint == e4).unwrap();
        assert_eq!(stat.count, 2);
        assert_eq!(stat.depth, Some(5));

        assert!(counter.filter(5, 3).iter().all(|s| s.fingerprint != e4));
        let shallow = counter.filter(1, 3);
        assert_eq!(shallow.len(), 1);
        assert_eq!(shallow[0].depth, Some(1));
    }

    #[test]
    fn test_config_views() {
        let counter = PositionCounter::from_pgns(["1. e4 e5"; 3]);
        let config = MiningConfig {
            min_depth: 2,
            ..MiningConfig::default()
        };
        assert_eq!(counter.ranked(&config).len(), 2);
        assert_eq!(counter.filtered(&config).len(), 1);
    }
}
