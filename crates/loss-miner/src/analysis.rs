//! Problem-position mining over a tracked user's lost games.

use chess_core::{MiningConfig, Outcome, PositionCounter, PositionStat, RawGame};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct MiningReport {
    /// Loss games handed to the aggregator.
    pub games_considered: usize,
    /// Loss games that could not be replayed.
    pub games_skipped: usize,
    pub most_common: Vec<PositionStat>,
    pub filtered: Vec<PositionStat>,
}

/// The tracked user's outcome in `game`, or `None` if they did not play it.
///
/// Prefers the per-side result code; falls back to the game-level result.
pub fn user_outcome(game: &RawGame, username: &str) -> Option<Outcome> {
    let (white, black) = game.side_outcomes();
    let (player, fallback) = if is_user(game.white.username.as_deref(), username) {
        (&game.white, white)
    } else if is_user(game.black.username.as_deref(), username) {
        (&game.black, black)
    } else {
        return None;
    };

    Some(
        player
            .result
            .as_deref()
            .map(Outcome::from_token)
            .unwrap_or(fallback),
    )
}

fn is_user(candidate: Option<&str>, username: &str) -> bool {
    candidate.is_some_and(|c| c.eq_ignore_ascii_case(username))
}

/// Movetext of every game the user did not win.
pub fn loss_pgns<'a>(games: &'a [RawGame], username: &str) -> Vec<&'a str> {
    games
        .iter()
        .filter(|g| matches!(user_outcome(g, username), Some(o) if o != Outcome::Win))
        .map(RawGame::pgn_or_empty)
        .collect()
}

/// Count positions across the user's losses and apply both threshold views.
pub fn mine_problem_positions(
    games: &[RawGame],
    username: &str,
    config: &MiningConfig,
) -> MiningReport {
    let pgns = loss_pgns(games, username);
    let counter = PositionCounter::from_pgns(pgns.iter().copied());

    let report = MiningReport {
        games_considered: pgns.len(),
        games_skipped: counter.games_skipped(),
        most_common: counter.ranked(config),
        filtered: counter.filtered(config),
    };

    info!(
        username,
        games = report.games_considered,
        skipped = report.games_skipped,
        positions = counter.len(),
        recurring = report.filtered.len(),
        "Mined problem positions"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::RawPlayer;

    fn game(white: &str, black: &str, result: &str, pgn: &str) -> RawGame {
        RawGame {
            url: Some(format!("https://example.test/{white}-{black}-{pgn}")),
            white: RawPlayer {
                username: Some(white.into()),
                ..Default::default()
            },
            black: RawPlayer {
                username: Some(black.into()),
                ..Default::default()
            },
            end_time: Some(1),
            pgn: Some(pgn.into()),
            result: Some(result.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_user_outcome_prefers_side_result() {
        let mut g = game("Hippo", "rival", "White", "1. e4");
        assert_eq!(user_outcome(&g, "hippo"), Some(Outcome::Win));
        assert_eq!(user_outcome(&g, "rival"), Some(Outcome::Loss));
        assert_eq!(user_outcome(&g, "stranger"), None);

        g.white.result = Some("timeout".into());
        assert_eq!(user_outcome(&g, "hippo"), Some(Outcome::Loss));
    }

    #[test]
    fn test_loss_pgns_selects_non_wins() {
        let games = vec![
            game("hippo", "a", "White", "1. d4"),
            game("hippo", "b", "Black", "1. e4 e5"),
            game("c", "hippo", "White", "1. c4"),
            game("d", "hippo", "Draw", "1. Nf3"),
            game("x", "y", "White", "1. b3"),
        ];
        assert_eq!(loss_pgns(&games, "hippo"), vec!["1. e4 e5", "1. c4", "1. Nf3"]);
    }

    #[test]
    fn test_mining_skips_unreplayable_losses() {
        let games = vec![
            game("hippo", "a", "Black", "1. e4 e5"),
            game("hippo", "b", "Black", "1. e4 e5"),
            game("hippo", "c", "Black", "1. e4 e5 2. Ke3"),
        ];
        let config = MiningConfig {
            min_occurrences: 2,
            min_depth: 2,
            min_count: 2,
            ..MiningConfig::default()
        };

        let report = mine_problem_positions(&games, "hippo", &config);
        assert_eq!(report.games_considered, 3);
        assert_eq!(report.games_skipped, 1);
        assert_eq!(report.most_common.len(), 2);
        assert!(report.most_common.iter().all(|s| s.count == 2));
        assert_eq!(report.filtered.len(), 1);
        assert_eq!(report.filtered[0].depth, Some(2));
    }
}
