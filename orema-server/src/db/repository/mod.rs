//! Repository Module
//!
//! Free functions over SQLite (sqlx). Single-statement functions are
//! generic over [`sqlx::Executor`] so they run on the pool or inside a
//! transaction (`&mut *tx`). Every query is scoped by `establishment_id`.

pub mod dining_table;
pub mod employee;
pub mod establishment;
pub mod order;
pub mod product;
pub mod role_permission;
pub mod supplement;
pub mod zone;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(target: "database", error = %msg, "Database error occurred");
                AppError::database("Database error")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Start a write transaction on the pool
///
/// `BEGIN IMMEDIATE` takes the write lock up front, so a concurrent writer
/// waits on `busy_timeout` instead of failing its lock upgrade.
pub async fn begin(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Commit a transaction started with [`begin`]
pub async fn commit(tx: Transaction<'static, Sqlite>) -> RepoResult<()> {
    Ok(tx.commit().await?)
}
