//! Device code request.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::{
    DEVICE_CODE_PATH, DeviceAuthenticator, SCOPES,
    classify::{Classification, check_error_response},
    types::{DeviceCodeResponse, DeviceVerification},
};
use crate::error::{Error, Result};

impl DeviceAuthenticator {
    pub(super) async fn request_device_code(
        &self,
        client_id: &str,
        audience: &str,
        cancel: &CancellationToken,
    ) -> Result<DeviceVerification> {
        let request = self.new_form_request(
            Method::POST,
            DEVICE_CODE_PATH,
            &[("client_id", client_id), ("scope", SCOPES), ("audience", audience)],
        )?;

        let (status, body) = self.exchange(request, cancel).await?;

        // Nothing is polling yet, so "pending" here is as fatal as any other code.
        if let Classification::Pending(error) = check_error_response(status, &body)? {
            return Err(Error::Authorization(error));
        }

        let res: DeviceCodeResponse =
            serde_json::from_slice(&body).map_err(|e| Error::decode("device code response", e))?;

        let verification = DeviceVerification::from_response(res, self.clock.now());
        tracing::info!(
            user_code = verification.user_code(),
            interval = ?verification.check_interval(),
            expires_at = %verification.expires_at(),
            "device code issued"
        );

        Ok(verification)
    }
}
