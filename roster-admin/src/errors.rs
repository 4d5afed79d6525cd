//! Client error taxonomy
//!
//! Every operation the orchestrator runs reports a [`ClientError`]. The
//! feedback layer turns it into user-facing text, preferring the
//! server-provided `detail` when there is one.

use thiserror::Error;

pub use crate::domains::auth::errors::AuthError;

/// Local input rejected before any network call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email and password are required.")]
    MissingCredentials,

    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("Salary must be a non-negative number, got '{0}'.")]
    InvalidSalary(String),
}

/// Non-2xx answer or transport failure from the directory server
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", describe_remote(.status, .detail, .cause))]
pub struct RemoteError {
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    /// `detail` string from the error body
    pub detail: Option<String>,
    /// Transport-level reason when no response arrived
    pub cause: Option<String>,
}

fn describe_remote(
    status: &Option<u16>,
    detail: &Option<String>,
    cause: &Option<String>,
) -> String {
    match (status, detail, cause) {
        (Some(status), Some(detail), _) => {
            format!("Request failed with status {status}: {detail}")
        }
        (Some(status), None, _) => format!("Request failed with status {status}"),
        (None, Some(detail), _) => format!("Request failed: {detail}"),
        (None, None, Some(cause)) => format!("Request failed: {cause}"),
        (None, None, None) => "Request failed".to_string(),
    }
}

impl RemoteError {
    pub fn new(status: u16, detail: Option<String>) -> Self {
        Self {
            status: Some(status),
            detail,
            cause: None,
        }
    }

    pub fn transport(err: &reqwest::Error) -> Self {
        Self {
            status: err.status().map(|status| status.as_u16()),
            detail: None,
            cause: Some(err.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// A 2xx response that did not match the expected shape
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Login response did not include an access token")]
    MissingToken,

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ClientError {
    /// Server-provided `detail` carried by this error, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Remote(remote) => remote.detail.as_deref(),
            ClientError::Auth(auth) => auth.detail(),
            ClientError::Validation(_) | ClientError::Protocol(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote(remote) => remote.status,
            ClientError::Auth(AuthError::LoginFailed { status, .. }) => *status,
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
