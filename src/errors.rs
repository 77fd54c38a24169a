//! Unified application error type.
//! The database layer, the config loader and the CLI all return AppError,
//! so callers only ever match on one enum.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Database-related
    // ---------------------------
    /// The database could not be opened, probed or set up, or the handle
    /// has already been closed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database rejected or failed to run a statement.
    #[error("Query error: {message} (sql: {sql})")]
    Query { message: String, sql: String },

    /// Structurally invalid input caught before reaching the database.
    #[error("Validation error: {0}")]
    Validation(String),

    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Output rendering
    // ---------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Wrap a driver error raised while running `sql`.
    pub fn query(sql: &str, err: rusqlite::Error) -> Self {
        AppError::Query {
            message: err.to_string(),
            sql: sql.to_string(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, AppError::Connection(_))
    }

    pub fn is_query(&self) -> bool {
        matches!(self, AppError::Query { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
