//! Wire payloads and the values handed between the two halves of the flow.

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Polling interval used when the server does not advertise one (RFC 8628).
pub(crate) const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

const fn default_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Response of the device-code endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub verification_uri_complete: String,
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

/// Success response of the token endpoint.
///
/// Every field is optional on the wire; a missing `access_token` decodes as
/// empty and is handled by the poller.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OAuthTokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A pending device login, created once per attempt by
/// [`Authenticator::verify_device`](super::Authenticator::verify_device).
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceVerification {
    device_code: String,
    user_code: String,
    verification_url: String,
    verification_complete_url: String,
    check_interval: Duration,
    expires_at: DateTime<Utc>,
}

impl DeviceVerification {
    /// Build a verification from raw parts.
    ///
    /// Normally produced by `verify_device`; public so fakes of
    /// [`Authenticator`](super::Authenticator) can construct one.
    pub fn new(
        device_code: impl Into<String>,
        user_code: impl Into<String>,
        verification_url: impl Into<String>,
        verification_complete_url: impl Into<String>,
        check_interval: Duration,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            device_code: device_code.into(),
            user_code: user_code.into(),
            verification_url: verification_url.into(),
            verification_complete_url: verification_complete_url.into(),
            check_interval,
            expires_at,
        }
    }

    pub(crate) fn from_response(res: DeviceCodeResponse, now: DateTime<Utc>) -> Self {
        let check_interval = Duration::from_secs(res.interval);
        let expires_at = i64::try_from(res.expires_in)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let verification_complete_url = if res.verification_uri_complete.is_empty() {
            res.verification_uri.clone()
        } else {
            res.verification_uri_complete
        };

        Self {
            device_code: res.device_code,
            user_code: res.user_code,
            verification_url: res.verification_uri,
            verification_complete_url,
            check_interval,
            expires_at,
        }
    }

    /// Opaque code echoed back on every poll. Never shown to the user.
    pub fn device_code(&self) -> &str {
        &self.device_code
    }

    /// Short code the user types on the verification page.
    pub fn user_code(&self) -> &str {
        &self.user_code
    }

    /// Page where the user enters the code.
    pub fn verification_url(&self) -> &str {
        &self.verification_url
    }

    /// Verification page with the user code already filled in.
    pub fn verification_complete_url(&self) -> &str {
        &self.verification_complete_url
    }

    /// Minimum spacing between token requests.
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Instant after which the device code is no longer redeemable.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether `now` is past the expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

impl fmt::Debug for DeviceVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceVerification")
            .field("device_code", &"<redacted>")
            .field("user_code", &self.user_code)
            .field("verification_url", &self.verification_url)
            .field("verification_complete_url", &self.verification_complete_url)
            .field("check_interval", &self.check_interval)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Tokens issued at the end of a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenResult {
    /// Bearer token for the API.
    pub access_token: String,
    /// Refresh token, if the server issued one.
    pub refresh_token: Option<String>,
    /// OpenID Connect ID token, if the server issued one.
    pub id_token: Option<String>,
    /// Lifetime of the access token.
    pub expires_in: Option<Duration>,
}

impl From<OAuthTokenResponse> for TokenResult {
    fn from(res: OAuthTokenResponse) -> Self {
        Self {
            access_token: res.access_token,
            refresh_token: res.refresh_token.filter(|t| !t.is_empty()),
            id_token: res.id_token.filter(|t| !t.is_empty()),
            expires_in: res.expires_in.map(Duration::from_secs),
        }
    }
}

impl fmt::Debug for TokenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |t: &Option<String>| t.as_ref().map(|_| "<redacted>");
        f.debug_struct("TokenResult")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &redact(&self.refresh_token))
            .field("id_token", &redact(&self.id_token))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
