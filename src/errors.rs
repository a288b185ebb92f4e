//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    /// Transaction-level conflict other than the sanctioned start race.
    /// The operation may be retried by the caller.
    #[error("Conflict, retry the operation: {0}")]
    Conflict(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("{0} not found: {1}")]
    NotFound(&'static str, i64),

    #[error("Actor {0} is not allowed to perform this operation")]
    Unauthorized(i64),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid approval transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Mutation attempted on a locked entry outside the unlock path.
    #[error("Time entry {0} is locked; unlock it for correction first")]
    LockedEntry(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid approval state: {0}")]
    InvalidApprovalState(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
