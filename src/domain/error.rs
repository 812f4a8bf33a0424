// src/domain/error.rs
use crate::domain::annotation::NewAnnotationBuilderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("List not found: {0}")]
    ListNotFound(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Cannot load page content: {0}")]
    ContentUnavailable(String),

    #[error("No active browser window")]
    NoActiveWindow,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Prefix the message with `context`; structural variants keep their shape.
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::Storage(msg) => DomainError::Storage(format!("{}: {}", context.into(), msg)),
            DomainError::Serialization(msg) => {
                DomainError::Serialization(format!("{}: {}", context.into(), msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            err => err,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(_))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}

impl From<NewAnnotationBuilderError> for DomainError {
    fn from(e: NewAnnotationBuilderError) -> Self {
        DomainError::Other(format!("Incomplete annotation: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_storage_error_when_add_context_then_message_is_prefixed() {
        let err = DomainError::Storage("disk full".to_string()).context("saving page");
        assert_eq!(err.to_string(), "Storage error: saving page: disk full");
    }

    #[test]
    fn given_not_found_error_when_add_context_then_variant_is_kept() {
        let err = DomainError::ListNotFound(42).context("inserting entry");
        assert!(matches!(err, DomainError::ListNotFound(42)));
    }
}
