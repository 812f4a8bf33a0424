// src/infrastructure/repositories/sqlite/error.rs

use crate::domain::error::DomainError;
use diesel::r2d2;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DieselError),

    #[error("Connection pool error: {0}")]
    ConnectionPoolError(String),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid field name: {0}")]
    InvalidField(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Blocking task failed: {0}")]
    TaskFailed(String),
}

pub type SqliteResult<T> = Result<T, SqliteRepositoryError>;

impl From<r2d2::PoolError> for SqliteRepositoryError {
    fn from(err: r2d2::PoolError) -> Self {
        SqliteRepositoryError::ConnectionPoolError(err.to_string())
    }
}

impl From<SqliteRepositoryError> for DomainError {
    fn from(err: SqliteRepositoryError) -> Self {
        match err {
            SqliteRepositoryError::DatabaseError(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => DomainError::Conflict(info.message().to_string()),
            SqliteRepositoryError::DatabaseError(DieselError::NotFound) => {
                DomainError::NotFound("document".to_string())
            }
            SqliteRepositoryError::Serialization(e) => DomainError::Serialization(e.to_string()),
            other => DomainError::Storage(other.to_string()),
        }
    }
}
