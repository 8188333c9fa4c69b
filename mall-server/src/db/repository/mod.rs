//! Repository Module
//!
//! CRUD operations over the SQLite pool. Repositories are free functions
//! taking `&SqlitePool` so they compose with transactions where needed.

// Accounts
pub mod admin;
pub mod user;

// Catalog
pub mod product;
pub mod promotion;

// Orders
pub mod order;

// Reporting
pub mod analytics;

use shared::error::{AppError, ErrorCode};
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
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Generic mapping into API errors. Handlers that know the resource
/// (order, product, ...) remap to precise codes before this fires.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::ValidationFailed, msg),
            RepoError::Database(msg) => AppError::with_message(ErrorCode::DatabaseError, msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
