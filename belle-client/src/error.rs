//! Client error types
//!
//! [`ClientError`] is what the transport saw. [`ServiceError`] is what a
//! screen shows: a kind plus a user-facing message.

use thiserror::Error;

/// Transport-level failure
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No response (connect failure, DNS, timeout)
    #[error("Network error: {message}")]
    Network { message: String, timeout: bool },

    /// Non-2xx response. `message` is the backend's `message` field, if any.
    #[error("HTTP {status}")]
    Http { status: u16, message: Option<String> },

    /// 2xx body that doesn't decode into the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Client construction failure
    #[error("Client setup error: {0}")]
    Setup(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-provided message, if the error carried a non-blank one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::Decode(err.to_string());
        }
        if err.is_builder() {
            return ClientError::Setup(err.to_string());
        }
        if let Some(status) = err.status() {
            return ClientError::Http {
                status: status.as_u16(),
                message: None,
            };
        }
        ClientError::Network {
            message: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type for transport operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Forbidden,
    Validation,
    Conflict,
    NotFound,
    Server,
    Cancelled,
    Other,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }
}

/// Domain-level failure with a user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "Requisição cancelada")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
