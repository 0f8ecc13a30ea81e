//! Error types for the device login flow.
//!
//! Every failure carries enough structure for a caller to tell apart a
//! transport problem, a malformed server response, an explicit rejection by
//! the authorization server, a local timeout and a caller cancellation.

use thiserror::Error;

use crate::auth::AuthError;

/// Error type for the login core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (invalid base URL, path escaping the base origin).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request could not be sent or the response could not be read.
    #[error("error performing http request: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("error decoding {context}: {source}")]
    Decode {
        /// What was being decoded.
        context: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The authorization server rejected the request with a terminal code.
    #[error("{0}")]
    Authorization(AuthError),

    /// The device code expired before the user completed the browser step.
    #[error("authentication timed out")]
    Timeout,

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Convenient Result type alias for login operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the process exit code a CLI should use for this error.
    ///
    /// - 1: General error
    /// - 2: Invalid configuration
    /// - 3: Authentication failed (denied or timed out)
    /// - 10: Network error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Authorization(_) | Error::Timeout => 3,
            Error::Transport(_) => 10,
            Error::Decode { .. } | Error::Cancelled => 1,
        }
    }

    /// Returns true if the device code expired without a terminal answer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    /// Returns true if the caller cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// The server's rejection, if this is an authorization error.
    pub fn auth_error(&self) -> Option<&AuthError> {
        match self {
            Error::Authorization(e) => Some(e),
            _ => None,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn decode(context: &'static str, source: serde_json::Error) -> Self {
        Error::Decode { context, source }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Authorization(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("invalid URL: {err}"))
    }
}
