//! Loss Miner
//!
//! Fetches a player's recent games, stores them, and reports the positions
//! that keep showing up in the games they lose.

use anyhow::bail;
use tracing::info;
use tracing_subscriber::EnvFilter;

use loss_miner::analysis;
use loss_miner::clients::chess_com::{self, ChessComClient};
use loss_miner::config::WorkerConfig;
use loss_miner::db;
use loss_miner::ingestion;

struct Args {
    username: String,
    limit: Option<usize>,
    mock: bool,
}

/// Parse `<username> [--limit N] [--mock]` from CLI args
fn parse_args() -> anyhow::Result<Args> {
    let mut username = None;
    let mut limit = None;
    let mut mock = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mock" => mock = true,
            "--limit" => {
                let Some(value) = args.next() else {
                    bail!("--limit needs a value");
                };
                limit = Some(value.parse()?);
            }
            _ if username.is_none() => username = Some(arg),
            _ => bail!("unexpected argument: {arg}"),
        }
    }

    let Some(username) = username else {
        bail!("usage: loss-miner <username> [--limit N] [--mock]");
    };
    Ok(Args { username, limit, mock })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = parse_args()?;
    let mut config = WorkerConfig::from_env();
    if let Some(limit) = args.limit {
        config.game_limit = limit;
    }
    config.use_mock |= args.mock;

    info!(database_url = %config.database_url, "Connecting to database...");
    let pool = db::pool::create_pool(&config.database_url).await?;
    db::pool::run_migrations(&pool).await?;

    let games = if config.use_mock {
        info!(path = %config.mock_games_path.display(), "Using mock games");
        chess_com::load_mock_games(&config.mock_games_path, config.game_limit)
    } else {
        let client = ChessComClient::new(&config)?;
        client
            .fetch_recent_games(&args.username, config.game_limit)
            .await?
    };
    info!(count = games.len(), "Fetched games");

    let summary = ingestion::ingest_games(&pool, &args.username, &games).await?;
    println!(
        "Stored {} new games ({} already present)",
        summary.inserted, summary.skipped_duplicates
    );

    let report = analysis::mine_problem_positions(&games, &args.username, &config.mining);

    println!("\nMost common positions in losses:");
    for stat in &report.most_common {
        println!("  Seen {} times -> {}", stat.count, stat.fingerprint);
    }

    println!(
        "\nRecurring positions (depth >= {}, count >= {}):",
        config.mining.min_depth, config.mining.min_count
    );
    for stat in &report.filtered {
        let depth = stat
            .depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  Seen {} times, depth: {} -> {}",
            stat.count,
            depth,
            stat.fingerprint.to_fen()
        );
    }

    pool.close().await;
    Ok(())
}
