//! Error taxonomy for the enrichment core
//!
//! Every failure crossing a component boundary is one of four kinds. Provider
//! clients report exactly one kind; only the orchestrators collapse several
//! failures into one, using [`ErrorKind`] ordering.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for provider clients, translators and pipelines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The provider did not answer within its budget, or the branch was cancelled
    #[error("API timeout: {message}")]
    Timeout { message: String },

    /// The outbound request could not be built or sent
    #[error("API request error: {message}")]
    Request { message: String },

    /// A response arrived but was malformed or signalled an error
    #[error("API response error: {message}")]
    Response { message: String },

    /// Anything not classified above
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Fieldless view of [`ApiError`], ordered by reporting precedence.
///
/// `ApiTimeout` is the greatest, so `max()` over a set of kinds picks the one to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InternalError,
    ApiResponseError,
    ApiRequestError,
    ApiTimeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ApiTimeout => "ApiTimeout",
            ErrorKind::ApiRequestError => "ApiRequestError",
            ErrorKind::ApiResponseError => "ApiResponseError",
            ErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

impl ApiError {
    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a new request error
    pub fn request<S: Into<String>>(message: S) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Create a new response error
    pub fn response<S: Into<String>>(message: S) -> Self {
        Self::Response {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Timeout { .. } => ErrorKind::ApiTimeout,
            ApiError::Request { .. } => ErrorKind::ApiRequestError,
            ApiError::Response { .. } => ErrorKind::ApiResponseError,
            ApiError::Internal { .. } => ErrorKind::InternalError,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ApiError::Timeout { message }
            | ApiError::Request { message }
            | ApiError::Response { message }
            | ApiError::Internal { message } => message,
        }
    }

    /// Pick the error to report out of several failures.
    ///
    /// Ties keep the first one seen. Returns `None` for an empty input.
    pub fn most_severe<I>(errors: I) -> Option<ApiError>
    where
        I: IntoIterator<Item = ApiError>,
    {
        errors.into_iter().fold(None, |worst, candidate| match worst {
            Some(current) if current.kind() >= candidate.kind() => Some(current),
            _ => Some(candidate),
        })
    }

    /// Reference HTTP status used by the routing layer
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::ApiTimeout | ErrorKind::ApiRequestError => 404,
            ErrorKind::ApiResponseError => 409,
            ErrorKind::InternalError => 500,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::timeout(err.to_string())
        } else if err.is_builder() || err.is_connect() || err.is_request() {
            ApiError::request(err.to_string())
        } else if err.is_status() || err.is_body() || err.is_decode() {
            ApiError::response(err.to_string())
        } else {
            ApiError::internal(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Data => ApiError::internal(format!("unexpected JSON shape: {err}")),
            Category::Syntax | Category::Eof | Category::Io => {
                ApiError::response(format!("malformed JSON body: {err}"))
            }
        }
    }
}

impl From<tokio::time::error::Elapsed> for ApiError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ApiError::timeout(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            ApiError::timeout(format!("task cancelled: {err}"))
        } else {
            ApiError::internal(format!("task failed: {err}"))
        }
    }
}
