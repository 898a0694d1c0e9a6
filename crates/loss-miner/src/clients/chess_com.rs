use std::path::Path;
use std::time::Duration;

use chess_core::RawGame;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::WorkerConfig;
use crate::error::FetchError;

const API_BASE: &str = "https://api.chess.com/pub";

#[derive(Deserialize)]
struct ArchivesResponse {
    #[serde(default)]
    archives: Vec<String>,
}

#[derive(Deserialize)]
struct GamesResponse {
    #[serde(default)]
    games: Vec<RawGame>,
}

pub struct ChessComClient {
    client: Client,
    archive_timeout: Duration,
}

impl ChessComClient {
    pub fn new(config: &WorkerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("LossMiner/1.0")
            .timeout(config.archives_timeout)
            .build()?;
        Ok(Self {
            client,
            archive_timeout: config.archive_timeout,
        })
    }

    /// Fetch the list of monthly archive URLs for `username`.
    pub async fn fetch_archives(&self, username: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{API_BASE}/player/{username}/games/archives");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: resp.status(),
            });
        }

        let data: ArchivesResponse = resp.json().await?;
        Ok(data.archives)
    }

    /// Fetch every game in one monthly archive.
    pub async fn fetch_games_from_archive(
        &self,
        archive_url: &str,
    ) -> Result<Vec<RawGame>, FetchError> {
        // Rate limit
        tokio::time::sleep(Duration::from_millis(100)).await;

        let resp = self
            .client
            .get(archive_url)
            .timeout(self.archive_timeout)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: archive_url.to_string(),
                status: resp.status(),
            });
        }

        let data: GamesResponse = resp.json().await?;
        Ok(data.games)
    }

    /// Collect up to `limit` games, walking archives newest-first.
    /// An archive that fails to load is skipped.
    pub async fn fetch_recent_games(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<RawGame>, FetchError> {
        let archives = newest_first(self.fetch_archives(username).await?);

        let mut games = Vec::new();
        for archive in &archives {
            if games.len() >= limit {
                break;
            }
            match self.fetch_games_from_archive(archive).await {
                Ok(batch) => {
                    debug!(archive = %archive, count = batch.len(), "Fetched archive");
                    games.extend(batch);
                }
                Err(e) => warn!(archive = %archive, error = %e, "Skipping archive"),
            }
        }

        games.truncate(limit);
        Ok(games)
    }
}

/// Archive URLs end in `/YYYY/MM`, so reverse lexical order is newest-first.
fn newest_first(mut archives: Vec<String>) -> Vec<String> {
    archives.sort_by(|a, b| b.cmp(a));
    archives
}

/// Read a JSON array of games from disk.
pub fn read_mock_games(path: &Path, limit: usize) -> Result<Vec<RawGame>, FetchError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| FetchError::MockData(format!("{}: {e}", path.display())))?;
    let mut games: Vec<RawGame> =
        serde_json::from_str(&text).map_err(|e| FetchError::MockData(e.to_string()))?;
    games.truncate(limit);
    Ok(games)
}

/// Like [`read_mock_games`], but an unreadable file yields no games.
pub fn load_mock_games(path: &Path, limit: usize) -> Vec<RawGame> {
    read_mock_games(path, limit).unwrap_or_else(|e| {
        warn!(error = %e, "Mock games unavailable");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let sorted = newest_first(vec![
            "https://api.chess.com/pub/player/x/games/2024/11".to_string(),
            "https://api.chess.com/pub/player/x/games/2025/02".to_string(),
            "https://api.chess.com/pub/player/x/games/2024/03".to_string(),
        ]);
        assert!(sorted[0].ends_with("2025/02"));
        assert!(sorted[2].ends_with("2024/03"));
    }

    #[test]
    fn test_games_response_tolerates_missing_fields() {
        let data: GamesResponse = serde_json::from_str(
            r#"{"games": [{"url": "u", "white": {"username": "a"}, "black": {"username": "b"}}]}"#,
        )
        .unwrap();
        assert_eq!(data.games.len(), 1);
        assert!(data.games[0].end_time.is_none());

        let empty: ArchivesResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.archives.is_empty());
    }

    #[test]
    fn test_load_mock_games_missing_file() {
        assert!(load_mock_games(Path::new("/nonexistent/mock_games.json"), 10).is_empty());
        assert!(matches!(
            read_mock_games(Path::new("/nonexistent/mock_games.json"), 10),
            Err(FetchError::MockData(_))
        ));
    }
}
