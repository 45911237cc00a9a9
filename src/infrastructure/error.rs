//! Errors raised at the platform API boundary

use std::fmt;

use thiserror::Error;

/// Category of a failed platform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: token missing or expired
    Unauthorized,
    /// 403: account disabled or not allowed
    Forbidden,
    NotFound,
    /// Other 4xx
    Client,
    /// 5xx and anything unexpected
    Server,
    /// Request never got a response (DNS, TLS, timeout, ...)
    Transport,
    /// Response body could not be decoded
    Decode,
}

impl ApiErrorKind {
    /// Map an HTTP status code of a failed response.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Client,
            _ => ApiErrorKind::Server,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::Client => "request rejected",
            ApiErrorKind::Server => "server error",
            ApiErrorKind::Transport => "connection failed",
            ApiErrorKind::Decode => "invalid response",
        };
        f.write_str(s)
    }
}

/// Failed platform call, tagged with its kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Error for a non-success HTTP response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::from_status(status), message)
    }
}

/// Result type for platform calls.
pub type ApiResult<T> = Result<T, ApiError>;
