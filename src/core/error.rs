use std::fmt;

use thiserror::Error;

/// Classification of a domain failure, used to pick a wire status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The message without the classification prefix.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::NotFound(msg)
            | DomainError::Internal(msg) => msg,
        }
    }

    /// Prefixes the message with `context`, keeping the classification.
    pub fn context(self, context: impl fmt::Display) -> Self {
        match self {
            DomainError::Validation(msg) => Self::Validation(format!("{context}: {msg}")),
            DomainError::Conflict(msg) => Self::Conflict(format!("{context}: {msg}")),
            DomainError::NotFound(msg) => Self::NotFound(format!("{context}: {msg}")),
            DomainError::Internal(msg) => Self::Internal(format!("{context}: {msg}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
