//! Error types for cinedex-core

use thiserror::Error;

/// Main error type for the cinedex-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Resource URI did not match any known route
    #[error("unknown resource uri: {0}")]
    UnknownUri(String),

    /// Insert did not produce a usable row id
    #[error("unable to insert rows into {0}")]
    InsertFailed(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Date parse error
    #[error("date error: {0}")]
    Date(#[from] chrono::ParseError),
}

/// Result type alias for cinedex-core
pub type Result<T> = std::result::Result<T, Error>;
