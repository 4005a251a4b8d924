use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the livestat pipeline.
#[derive(Error, Debug)]
pub enum LiveStatError {
    /// The SQL dump could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output artifact could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dump script failed to execute against the in-memory database.
    #[error("Failed to execute SQL script: {0}")]
    SqlScript(#[from] rusqlite::Error),

    /// A query against a required monitoring table failed.
    #[error("Failed to query table {table}: {source}")]
    Query {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The dataset could not be encoded or decoded as JSON.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An artifact did not carry the expected `window.LIVE_DATA = ...;` wrapper.
    #[error("Malformed data artifact: {0}")]
    MalformedArtifact(String),
}

/// Convenience alias used throughout the livestat crates.
pub type Result<T> = std::result::Result<T, LiveStatError>;
