use crate::constants::{
    ERROR_CANCELLED, ERROR_EMPTY_BODY, ERROR_HTTP, ERROR_INTERNAL, ERROR_NETWORK, ERROR_PARSE,
    ERROR_TIMEOUT,
};
use serde::Serialize;

/// Coarse classification used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Timeout,
    Http,
    Cancelled,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Http => "http",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("storefront returned HTTP {status}")]
    Http { status: u16 },
    #[error("storefront returned an empty body")]
    EmptyBody,
    #[error("parse error: {0}")]
    Parse(String),
    #[error("request cancelled")]
    Cancelled { user_initiated: bool },
    #[error("internal error: {0}")]
    Internal(String),
}

impl SearchError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::EmptyBody | Self::Parse(_) | Self::Internal(_) => ErrorKind::Unknown,
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => ERROR_NETWORK,
            Self::Timeout => ERROR_TIMEOUT,
            Self::Http { .. } => ERROR_HTTP,
            Self::EmptyBody => ERROR_EMPTY_BODY,
            Self::Parse(_) => ERROR_PARSE,
            Self::Cancelled { .. } => ERROR_CANCELLED,
            Self::Internal(_) => ERROR_INTERNAL,
        }
    }

    /// A superseded request. Never surfaced to the user.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::Cancelled {
                user_initiated: false
            }
        )
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Network => {
                "Unable to reach the store. Check your connection and try again.".to_string()
            }
            ErrorKind::Timeout => "Search is taking too long. Please try again.".to_string(),
            ErrorKind::Http => match self {
                Self::Http { status } if *status >= 500 => {
                    "The store is having trouble right now. Please try again shortly.".to_string()
                }
                _ => "Search is unavailable right now.".to_string(),
            },
            ErrorKind::Cancelled => "Search cancelled.".to_string(),
            ErrorKind::Unknown => "Something went wrong while searching.".to_string(),
        }
    }
}

/// Failures raised by a [`crate::storage::KeyValueStorage`] backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage I/O error: {0}")]
    Io(String),
    #[error("failed to encode cache blob: {0}")]
    Encoding(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
