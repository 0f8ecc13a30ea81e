//! Authorization server configuration.
//!
//! Resolution order (highest to lowest):
//! 1. Values set programmatically with the `with_*` setters
//! 2. Environment variables: `PSCALE_AUTH_URL`, `PSCALE_OAUTH_CLIENT_ID`, `PSCALE_AUDIENCE`
//! 3. Defaults

use url::Url;

use crate::error::{Error, Result};

/// Default authorization server.
pub const DEFAULT_BASE_URL: &str = "https://planetscale.us.auth0.com/";

/// Default API audience the issued token is valid for.
pub const DEFAULT_AUDIENCE_URL: &str = "https://bb-test-api.planetscale.com";

/// Default OAuth client identifier of the CLI.
pub const DEFAULT_OAUTH_CLIENT_ID: &str = "ZK3V2a5UERfOlWxi5xRXrZZFmvhnf1vg";

const ENV_BASE_URL: &str = "PSCALE_AUTH_URL";
const ENV_CLIENT_ID: &str = "PSCALE_OAUTH_CLIENT_ID";
const ENV_AUDIENCE: &str = "PSCALE_AUDIENCE";

/// Target authorization server and the identity the CLI presents to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    base_url: Url,
    client_id: String,
    audience: String,
}

impl AuthConfig {
    /// Create a configuration for a specific authorization server.
    pub fn new(
        base_url: &str,
        client_id: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            client_id: client_id.into(),
            audience: audience.into(),
        })
    }

    /// Load the defaults with environment variable overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the defaults with overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = parse_base_url(&url)
                .map_err(|e| Error::config(format!("{ENV_BASE_URL}: {e}")))?;
        }
        if let Some(client_id) = get(ENV_CLIENT_ID) {
            config.client_id = client_id;
        }
        if let Some(audience) = get(ENV_AUDIENCE) {
            config.audience = audience;
        }

        Ok(config)
    }

    /// Replace the authorization server base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Replace the OAuth client identifier.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Replace the API audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Authorization server base URL. Always ends with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// OAuth client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// API audience.
    pub fn audience(&self) -> &str {
        &self.audience
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            client_id: DEFAULT_OAUTH_CLIENT_ID.to_string(),
            audience: DEFAULT_AUDIENCE_URL.to_string(),
        }
    }
}

/// Parse a base URL, appending a trailing slash so relative joins keep the
/// last path segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::config(format!("'{raw}' cannot be used as a base URL")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
