//! OAuth 2.0 Device Authorization Grant (RFC 8628) login flow.
//!
//! The flow has two halves run back to back by the caller:
//! 1. [`Authenticator::verify_device`] obtains a device code and the user code
//!    to show on screen.
//! 2. [`Authenticator::get_access_token_for_device`] polls the token endpoint
//!    until the user approves, denies, or the device code expires.
//!
//! Both accept a [`CancellationToken`] that aborts any in-flight wait or
//! request.

mod classify;
mod device;
mod poll;
mod request;
mod types;

use std::sync::Arc;

use async_trait::async_trait;
pub use classify::{AuthError, Classification, ErrorCode, check_error_response};
use tokio_util::sync::CancellationToken;
pub use types::{DeviceVerification, TokenResult};

use crate::{
    clock::{Clock, SystemClock},
    config::AuthConfig,
    error::{Error, Result},
};

/// Scopes requested for every CLI login.
pub const SCOPES: &str = "profile,email,read:databases,write:databases";

/// Grant type of the device-code token exchange.
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

const DEVICE_CODE_PATH: &str = "oauth/device/code";
const TOKEN_PATH: &str = "oauth/token";

/// Authentication via the device authorization flow.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Request a device code and user code for `client_id`, valid for
    /// `audience`.
    async fn verify_device(
        &self,
        client_id: &str,
        audience: &str,
        cancel: &CancellationToken,
    ) -> Result<DeviceVerification>;

    /// Poll the token endpoint until the login completes, fails, or expires.
    async fn poll_for_token(
        &self,
        verification: &DeviceVerification,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenResult>;

    /// Like [`poll_for_token`](Self::poll_for_token) but returns only the
    /// access token.
    async fn get_access_token_for_device(
        &self,
        verification: &DeviceVerification,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let token = self.poll_for_token(verification, client_id, cancel).await?;
        Ok(token.access_token)
    }
}

/// [`Authenticator`] talking to a real authorization server over HTTP.
#[derive(Clone)]
pub struct DeviceAuthenticator {
    client: reqwest::Client,
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl DeviceAuthenticator {
    /// Create an authenticator with a fresh HTTP client.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = build_client(
            reqwest::Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))),
        )?;

        Ok(Self::with_client(client, config))
    }

    /// Create an authenticator on top of an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: AuthConfig) -> Self {
        Self { client, config, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used for expiry and the wait between polls.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The authorization server configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// [`verify_device`](Authenticator::verify_device) with the configured
    /// client identifier and audience.
    pub async fn verify_device_default(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DeviceVerification> {
        self.request_device_code(self.config.client_id(), self.config.audience(), cancel).await
    }
}

/// Builder failures surface as `Error::Config`.
fn build_client(builder: reqwest::ClientBuilder) -> Result<reqwest::Client> {
    builder.build().map_err(|e| Error::config(format!("error creating HTTP client: {e}")))
}

impl std::fmt::Debug for DeviceAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceAuthenticator").field("config", &self.config).finish()
    }
}

#[async_trait]
impl Authenticator for DeviceAuthenticator {
    async fn verify_device(
        &self,
        client_id: &str,
        audience: &str,
        cancel: &CancellationToken,
    ) -> Result<DeviceVerification> {
        self.request_device_code(client_id, audience, cancel).await
    }

    async fn poll_for_token(
        &self,
        verification: &DeviceVerification,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenResult> {
        self.poll(verification, client_id, cancel).await
    }
}
