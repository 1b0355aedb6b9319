//! Centralized client error handling for the GiftMarket client
//!
//! This module provides a unified error type for everything the client can
//! surface to the user, plus the transient `Notice` records that stand in for
//! toast presentation (rendering itself is out of scope).

use thiserror::Error;
use tokio::sync::RwLock;

/// Client error taxonomy
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client-side validation failure; blocks the network call entirely.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure or an unexpected non-2xx response.
    #[error("Network error: {0}")]
    Network(String),

    /// Referenced order or user does not exist server-side.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server-enforced role/state rule rejected a transition or join.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Durable local storage failure (external id file).
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Precondition(_) => "PRECONDITION_FAILED",
            ClientError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

// Convenience conversions from common error types

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Network(format!("Invalid response body: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A transient user-facing notice (stand-in for toast presentation)
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Build an error notice from a surfaced client error
    pub fn from_error(title: impl Into<String>, err: &ClientError) -> Self {
        Self::error(title, err.to_string())
    }
}

/// In-memory log of surfaced notices, newest last
#[derive(Default)]
pub struct NoticeLog {
    entries: RwLock<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notice and emit a tracing event at matching severity
    pub async fn push(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => {
                tracing::warn!(title = %notice.title, message = %notice.message, "notice");
            }
            _ => {
                tracing::info!(title = %notice.title, message = %notice.message, "notice");
            }
        }
        self.entries.write().await.push(notice);
    }

    pub async fn entries(&self) -> Vec<Notice> {
        self.entries.read().await.clone()
    }

    pub async fn last(&self) -> Option<Notice> {
        self.entries.read().await.last().cloned()
    }
}
