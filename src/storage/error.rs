//! Entry store error types
//!
//! Defines all errors that can occur in the storage layer.

use crate::catalog::LevelError;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in the entry store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be decoded
    #[error("Corrupt data: {0}")]
    Corruption(String),

    /// Another entry already occupies this date
    #[error("An entry for {0} already exists")]
    DateTaken(NaiveDate),

    /// A level outside its metric's bounds
    #[error("Invalid level: {0}")]
    InvalidLevel(#[from] LevelError),

    /// Invalid date range (start > end)
    #[error("Invalid date range: start must not be after end")]
    InvalidRange,

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
