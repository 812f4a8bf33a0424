//! Remote error types and conversions

use crate::application::error::ApplicationError;
use crate::domain::error::DomainError;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params for {method}: {message}")]
    InvalidParams { method: &'static str, message: String },

    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for RemoteError {
    fn from(err: DomainError) -> Self {
        RemoteError::Application(ApplicationError::Domain(err))
    }
}

impl RemoteError {
    pub fn code(&self) -> i64 {
        match self {
            RemoteError::UnknownMethod(_) => -32601,
            RemoteError::InvalidParams { .. } => -32602,
            RemoteError::Application(ApplicationError::Validation(_)) => -32602,
            RemoteError::Application(ApplicationError::Domain(err)) => match err {
                DomainError::ListNotFound(_) | DomainError::NotFound(_) | DomainError::NoActiveWindow => -32001,
                DomainError::Storage(_) | DomainError::Serialization(_) | DomainError::Io(_) => -32002,
                DomainError::InvalidUrl(_) | DomainError::InvalidTag(_) => -32602,
                _ => -32003,
            },
            RemoteError::Application(ApplicationError::Other(_)) => -32004,
            RemoteError::Internal(_) => -32603,
        }
    }

    /// Convert error to a JSON response
    pub fn to_response(&self) -> Value {
        json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": self.to_string()
            }
        })
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
