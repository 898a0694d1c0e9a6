use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::IngestError;

/// A game row ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub url: String,
    pub white_username: String,
    pub black_username: String,
    pub white_rating: i32,
    pub black_rating: i32,
    pub time_control: Option<String>,
    pub time_class: Option<String>,
    pub end_time: DateTime<Utc>,
    pub pgn: Option<String>,
    pub result: String,
    pub white_result: String,
    pub black_result: String,
    pub opening_id: String,
    pub elo_change_white: f64,
    pub elo_change_black: f64,
    pub user_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct GameRecord {
    pub id: i64,
    pub url: String,
    pub white_username: String,
    pub black_username: String,
    pub white_rating: i64,
    pub black_rating: i64,
    pub time_control: Option<String>,
    pub time_class: Option<String>,
    pub end_time: DateTime<Utc>,
    pub pgn: Option<String>,
    pub result: String,
    pub white_result: String,
    pub black_result: String,
    pub opening_id: String,
    pub elo_change_white: f64,
    pub elo_change_black: f64,
    pub user_id: i64,
}

pub async fn game_exists<'e, E>(executor: E, url: &str) -> Result<bool, IngestError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM games WHERE url = ?)")
        .bind(url)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

pub async fn insert_game<'e, E>(executor: E, game: &NewGame) -> Result<i64, IngestError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query(
        r#"INSERT INTO games (
            url, white_username, black_username, white_rating, black_rating,
            time_control, time_class, end_time, pgn, result,
            white_result, black_result, opening_id,
            elo_change_white, elo_change_black, user_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&game.url)
    .bind(&game.white_username)
    .bind(&game.black_username)
    .bind(game.white_rating)
    .bind(game.black_rating)
    .bind(&game.time_control)
    .bind(&game.time_class)
    .bind(game.end_time)
    .bind(&game.pgn)
    .bind(&game.result)
    .bind(&game.white_result)
    .bind(&game.black_result)
    .bind(&game.opening_id)
    .bind(game.elo_change_white)
    .bind(game.elo_change_black)
    .bind(game.user_id)
    .execute(executor)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn find_by_url(pool: &SqlitePool, url: &str) -> Result<Option<GameRecord>, IngestError> {
    let game = sqlx::query_as::<_, GameRecord>(
        r#"SELECT id, url, white_username, black_username, white_rating, black_rating,
                  time_control, time_class, end_time, pgn, result,
                  white_result, black_result, opening_id,
                  elo_change_white, elo_change_black, user_id
           FROM games WHERE url = ?"#,
    )
    .bind(url)
    .fetch_optional(pool)
    .await?;

    Ok(game)
}

pub async fn count_games(pool: &SqlitePool) -> Result<i64, IngestError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM games")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
