//! Worker configuration from environment variables

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chess_core::MiningConfig;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// SQLite connection URL
    pub database_url: String,

    /// Read games from `mock_games_path` instead of the network
    pub use_mock: bool,

    pub mock_games_path: PathBuf,

    /// Maximum number of recent games to fetch per run
    pub game_limit: usize,

    /// Timeout for the archive list request
    pub archives_timeout: Duration,

    /// Timeout for each monthly archive request
    pub archive_timeout: Duration,

    pub mining: MiningConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://chess_analytics.db?mode=rwc".to_string(),
            use_mock: false,
            mock_games_path: PathBuf::from("data/mock_games.json"),
            game_limit: 100,
            archives_timeout: Duration::from_secs(20),
            archive_timeout: Duration::from_secs(3),
            mining: MiningConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables. Missing or
    /// unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mining = defaults.mining;

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            use_mock: env::var("CHESS_API_MODE").is_ok_and(|v| v == "mock"),
            mock_games_path: env::var("MOCK_GAMES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.mock_games_path),
            game_limit: env_or("GAME_LIMIT", defaults.game_limit),
            archives_timeout: Duration::from_secs(env_or("ARCHIVES_TIMEOUT_SECS", 20)),
            archive_timeout: Duration::from_secs(env_or("ARCHIVE_TIMEOUT_SECS", 3)),
            mining: MiningConfig {
                min_occurrences: env_or("MIN_OCCURRENCES", mining.min_occurrences),
                top_n: env_or("TOP_N", mining.top_n),
                min_depth: env_or("MIN_DEPTH", mining.min_depth),
                min_count: env_or("MIN_COUNT", mining.min_count),
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
