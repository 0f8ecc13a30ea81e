//! Form-encoded request construction and cancellable exchange.

use reqwest::{
    Method, Request, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

use super::DeviceAuthenticator;
use crate::error::{Error, Result};

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_MEDIA_TYPE: &str = "application/json";

impl DeviceAuthenticator {
    /// Create a request for `path` relative to the configured base URL.
    ///
    /// `GET` requests carry no body. Every other method sends `body`
    /// form-URL-encoded. All requests accept JSON. A `path` that would resolve
    /// to a different origin than the base URL is rejected.
    pub fn new_form_request(
        &self,
        method: Method,
        path: &str,
        body: &[(&str, &str)],
    ) -> Result<Request> {
        let base = self.config.base_url();
        let url = base.join(path)?;
        if url.origin() != base.origin() {
            return Err(Error::config(format!("request path '{path}' escapes {base}")));
        }

        let mut builder = self.client.request(method.clone(), url).header(ACCEPT, JSON_MEDIA_TYPE);

        if method != Method::GET {
            let encoded = form_urlencoded::Serializer::new(String::new()).extend_pairs(body).finish();
            builder = builder.header(CONTENT_TYPE, FORM_MEDIA_TYPE).body(encoded);
        }

        builder.build().map_err(|e| Error::config(format!("error creating request: {e}")))
    }

    /// Send `request` and read the whole body, aborting if `cancel` fires.
    pub(crate) async fn exchange(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let path = request.url().path().to_string();
        let exchange = async {
            let res = self.client.execute(request).await?;
            let status = res.status();
            let body = res.bytes().await?;
            Ok::<_, Error>((status, body.to_vec()))
        };

        let (status, body) = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            result = exchange => result?,
        };

        tracing::debug!(path = %path, status = status.as_u16(), "authorization server responded");
        Ok((status, body))
    }
}
