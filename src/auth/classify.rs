//! Classification of authorization server error responses.
//!
//! The server answers both endpoints with `{error, error_description}` on a
//! 4xx/5xx status. Two codes mean "the flow is still in progress" and are not
//! failures; everything else ends the login attempt.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Error, Result};

/// OAuth error codes returned by the authorization server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ErrorCode {
    /// The user has not completed the browser step yet.
    AuthorizationPending,
    /// The client is polling faster than the server allows.
    SlowDown,
    /// The user declined the authorization request.
    AccessDenied,
    /// The device code expired.
    ExpiredToken,
    /// The device code is invalid or was already redeemed.
    InvalidGrant,
    /// The client identifier is unknown.
    InvalidClient,
    /// The request is malformed.
    InvalidRequest,
    /// The client may not use the device grant.
    UnauthorizedClient,
    /// The requested scope is not allowed.
    InvalidScope,
    /// Any code outside the known vocabulary.
    Other(String),
}

impl ErrorCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AuthorizationPending => "authorization_pending",
            Self::SlowDown => "slow_down",
            Self::AccessDenied => "access_denied",
            Self::ExpiredToken => "expired_token",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidClient => "invalid_client",
            Self::InvalidRequest => "invalid_request",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::InvalidScope => "invalid_scope",
            Self::Other(code) => code,
        }
    }

    /// True for codes that mean "keep polling".
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::AuthorizationPending | Self::SlowDown)
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "authorization_pending" => Self::AuthorizationPending,
            "slow_down" => Self::SlowDown,
            "access_denied" => Self::AccessDenied,
            "expired_token" => Self::ExpiredToken,
            "invalid_grant" => Self::InvalidGrant,
            "invalid_client" => Self::InvalidClient,
            "invalid_request" => Self::InvalidRequest,
            "unauthorized_client" => Self::UnauthorizedClient,
            "invalid_scope" => Self::InvalidScope,
            _ => Self::Other(code),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error response from the authorization server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthError {
    #[serde(rename = "error")]
    code: ErrorCode,
    #[serde(rename = "error_description", default)]
    description: String,
}

impl AuthError {
    /// Create an error response.
    pub fn new(code: ErrorCode, description: impl Into<String>) -> Self {
        Self { code, description: description.into() }
    }

    /// The OAuth error code.
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// The human-readable description sent by the server.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.code)
        } else {
            f.write_str(&self.description)
        }
    }
}

impl std::error::Error for AuthError {}

/// Result of classifying a response that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Status below 400; the body holds the success payload.
    Proceed,
    /// `authorization_pending` or `slow_down`; the flow is still in progress.
    Pending(AuthError),
}

/// Classify a response by status and body.
///
/// Terminal server errors come back as [`Error::Authorization`]; a body that
/// cannot be decoded as an error response is an [`Error::Decode`].
pub fn check_error_response(status: StatusCode, body: &[u8]) -> Result<Classification> {
    if status.as_u16() < 400 {
        return Ok(Classification::Proceed);
    }

    let error: AuthError =
        serde_json::from_slice(body).map_err(|e| Error::decode("error response", e))?;

    if error.code.is_transient() {
        return Ok(Classification::Pending(error));
    }

    Err(Error::Authorization(error))
}
