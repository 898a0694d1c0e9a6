//! Ingestion and fetch error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Game payload missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid end_time: {0}")]
    InvalidTimestamp(i64),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Mock data error: {0}")]
    MockData(String),
}
