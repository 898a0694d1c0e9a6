use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // Every connection to an in-memory database is its own database.
    if database_url.contains(":memory:") {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Run the schema migration inline.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Tracked users (created lazily on first ingestion)
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT UNIQUE NOT NULL,
    created_at  TEXT NOT NULL
);

-- Ingested games; url is the global dedup key
CREATE TABLE IF NOT EXISTS games (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    url               TEXT UNIQUE NOT NULL,
    white_username    TEXT NOT NULL,
    black_username    TEXT NOT NULL,
    white_rating      INTEGER NOT NULL,
    black_rating      INTEGER NOT NULL,
    time_control      TEXT,
    time_class        TEXT,
    end_time          TEXT NOT NULL,
    pgn               TEXT,
    result            TEXT NOT NULL,
    white_result      TEXT NOT NULL,
    black_result      TEXT NOT NULL,
    opening_id        TEXT NOT NULL DEFAULT 'Unknown',
    elo_change_white  REAL NOT NULL,
    elo_change_black  REAL NOT NULL,
    user_id           INTEGER NOT NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_games_user_id ON games (user_id);
"#;
