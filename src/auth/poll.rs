//! Token polling loop.
//!
//! Each iteration waits the server-dictated interval, then asks for a token
//! once. The loop ends on a token, a terminal server error, a transport or
//! decode failure, cancellation, or once the device code's fixed expiry has
//! passed after an inconclusive answer. There is no separate attempt limit.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::{
    DEVICE_CODE_GRANT_TYPE, DeviceAuthenticator, TOKEN_PATH,
    classify::{Classification, check_error_response},
    types::{DeviceVerification, OAuthTokenResponse, TokenResult},
};
use crate::error::{Error, Result};

impl DeviceAuthenticator {
    pub(super) async fn poll(
        &self,
        verification: &DeviceVerification,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<TokenResult> {
        let mut attempt: u32 = 0;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Error::Cancelled),
                () = self.clock.sleep(verification.check_interval()) => {},
            }

            attempt = attempt.saturating_add(1);
            tracing::debug!(attempt, "requesting access token");

            if let Some(token) =
                self.request_token(verification.device_code(), client_id, cancel).await?
            {
                tracing::info!(attempts = attempt, "device login complete");
                return Ok(token);
            }

            if verification.is_expired_at(self.clock.now()) {
                tracing::debug!(attempts = attempt, "device code expired while pending");
                return Err(Error::Timeout);
            }
        }
    }

    /// One token exchange. `None` means the login is still in progress.
    async fn request_token(
        &self,
        device_code: &str,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<TokenResult>> {
        let request = self.new_form_request(
            Method::POST,
            TOKEN_PATH,
            &[
                ("grant_type", DEVICE_CODE_GRANT_TYPE),
                ("device_code", device_code),
                ("client_id", client_id),
            ],
        )?;

        let (status, body) = self.exchange(request, cancel).await?;

        if let Classification::Pending(pending) = check_error_response(status, &body)? {
            tracing::debug!(code = %pending.code(), "authorization still pending");
            return Ok(None);
        }

        let res: OAuthTokenResponse =
            serde_json::from_slice(&body).map_err(|e| Error::decode("token response", e))?;

        if res.access_token.is_empty() {
            tracing::warn!(status = status.as_u16(), "token response without access token");
            return Ok(None);
        }

        Ok(Some(TokenResult::from(res)))
    }
}
