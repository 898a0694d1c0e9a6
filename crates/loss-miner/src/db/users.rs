use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::IngestError;

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, IngestError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a user. Runs outside any batch transaction, so the row is
/// committed as soon as this returns.
pub async fn create_user(pool: &SqlitePool, username: &str) -> Result<User, IngestError> {
    let created_at = Utc::now();
    let id = sqlx::query("INSERT INTO users (username, created_at) VALUES (?, ?)")
        .bind(username)
        .bind(created_at)
        .execute(pool)
        .await?
        .last_insert_rowid();

    Ok(User {
        id,
        username: username.to_string(),
        created_at,
    })
}

pub async fn get_or_create(pool: &SqlitePool, username: &str) -> Result<User, IngestError> {
    if let Some(user) = find_by_username(pool, username).await? {
        return Ok(user);
    }
    tracing::info!(username, "Creating user");
    create_user(pool, username).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, run_migrations};

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let pool = setup_test_db().await;

        let first = get_or_create(&pool, "hippo").await.unwrap();
        let second = get_or_create(&pool, "hippo").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.username, "hippo");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let pool = setup_test_db().await;
        assert!(find_by_username(&pool, "nobody").await.unwrap().is_none());
    }
}
