//! Deduplicating, all-or-nothing ingestion of provider games.
//!
//! One call handles one batch for one tracked user. The user row is committed
//! on its own; every game row in the batch shares a single transaction. Two
//! concurrent calls for the same user are not coordinated here and must be
//! serialized by the caller.

use chess_core::elo::elo_delta;
use chess_core::opening::opening_key;
use chess_core::RawGame;
use chrono::DateTime;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::db::games::{self, NewGame};
use crate::db::users;
use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub user_id: i64,
    pub inserted: usize,
    pub skipped_duplicates: usize,
}

/// Ingest `games` for `username`.
///
/// Games whose URL is already stored are skipped. If anything fails for any
/// game, no game from this batch is persisted and the error is returned.
pub async fn ingest_games(
    pool: &SqlitePool,
    username: &str,
    games: &[RawGame],
) -> Result<IngestSummary, IngestError> {
    let user = users::get_or_create(pool, username).await?;

    let mut tx = pool.begin().await?;
    let (inserted, skipped_duplicates) = match stage_games(&mut tx, user.id, games).await {
        Ok(counts) => counts,
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            warn!(username, error = %e, "Ingestion batch rolled back");
            return Err(e);
        }
    };
    tx.commit().await?;

    info!(username, inserted, skipped_duplicates, "Ingested games");
    Ok(IngestSummary {
        user_id: user.id,
        inserted,
        skipped_duplicates,
    })
}

async fn stage_games(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    games: &[RawGame],
) -> Result<(usize, usize), IngestError> {
    let mut inserted = 0;
    let mut skipped = 0;

    for game in games {
        let url = game.url.as_deref().ok_or(IngestError::MissingField("url"))?;

        // Also catches repeats within this batch: earlier rows are visible
        // inside the transaction.
        if games::game_exists(&mut **tx, url).await? {
            debug!(url, "Skipping already ingested game");
            skipped += 1;
            continue;
        }

        let record = build_record(game, user_id)?;
        games::insert_game(&mut **tx, &record).await?;
        inserted += 1;
    }

    Ok((inserted, skipped))
}

/// Derive the stored row from a provider payload.
pub fn build_record(game: &RawGame, user_id: i64) -> Result<NewGame, IngestError> {
    let url = game.url.clone().ok_or(IngestError::MissingField("url"))?;
    let white_username = game
        .white
        .username
        .clone()
        .ok_or(IngestError::MissingField("white.username"))?;
    let black_username = game
        .black
        .username
        .clone()
        .ok_or(IngestError::MissingField("black.username"))?;
    let end_secs = game.end_time.ok_or(IngestError::MissingField("end_time"))?;
    let end_time =
        DateTime::from_timestamp(end_secs, 0).ok_or(IngestError::InvalidTimestamp(end_secs))?;

    let (white_outcome, black_outcome) = game.side_outcomes();
    let white_rating = game.white.rating_or_default();
    let black_rating = game.black.rating_or_default();

    Ok(NewGame {
        url,
        white_username,
        black_username,
        white_rating,
        black_rating,
        time_control: game.time_control.clone(),
        time_class: game.time_class.clone(),
        end_time,
        pgn: game.pgn.clone(),
        result: game.result.clone().unwrap_or_else(|| "unknown".to_string()),
        white_result: white_outcome.as_str().to_string(),
        black_result: black_outcome.as_str().to_string(),
        opening_id: opening_key(game.pgn_or_empty()).to_string(),
        elo_change_white: elo_delta(white_rating, black_rating, white_outcome),
        elo_change_black: elo_delta(black_rating, white_rating, black_outcome),
        user_id,
    })
}
