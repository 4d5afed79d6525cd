//! Authentication error types

use thiserror::Error;

/// Failures of the login and token custody paths
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The server answered the login with 404
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Any other login rejection
    #[error("Login failed{}", describe_failure(.status, .detail))]
    LoginFailed {
        status: Option<u16>,
        detail: Option<String>,
    },

    /// An authenticated call needed the durable token and none was stored
    #[error("No session token is stored")]
    MissingToken,

    /// A newer login or a logout ended the session before the server answered
    #[error("Login superseded by a newer session")]
    Superseded,
}

fn describe_failure(status: &Option<u16>, detail: &Option<String>) -> String {
    match (status, detail) {
        (Some(status), Some(detail)) => format!(" ({status}): {detail}"),
        (Some(status), None) => format!(" ({status})"),
        (None, Some(detail)) => format!(": {detail}"),
        (None, None) => String::new(),
    }
}

impl AuthError {
    /// Server-provided detail, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            AuthError::LoginFailed { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Durable token store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to initialize storage: {0}")]
    InitFailed(String),

    #[error("Failed to read from storage")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write to storage")]
    WriteFailed(#[source] std::io::Error),

    #[error("Corrupted storage data: {0}")]
    CorruptedData(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
