//! Database layer (SQLite).

pub mod schema;
pub mod sqlite;

pub use sqlite::HikeDb;

/// Errors produced by the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A required value was blank.
    #[error("Required value not provided")]
    MissingValue,

    /// No row matched (for ownership-scoped writes this also means "not yours").
    #[error("Record not found")]
    NotFound,

    /// The blocking task running the query panicked or was cancelled.
    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
