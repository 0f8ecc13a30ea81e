//! Device Authorization Grant login for the PlanetScale CLI.
//!
//! This crate turns a terminal session into an access token without ever
//! handling a password: the CLI shows a short user code, the user approves it
//! in a browser, and the crate polls the authorization server until a token
//! is issued.
//!
//! ## Usage
//!
//! ```no_run
//! use pscale_auth::{AuthConfig, Authenticator, DeviceAuthenticator};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn login() -> pscale_auth::Result<String> {
//! let config = AuthConfig::from_env()?;
//! let auth = DeviceAuthenticator::new(config.clone())?;
//! let cancel = CancellationToken::new();
//!
//! let verification = auth.verify_device(config.client_id(), config.audience(), &cancel).await?;
//! eprintln!("Visit {} and enter {}", verification.verification_url(), verification.user_code());
//!
//! auth.get_access_token_for_device(&verification, config.client_id(), &cancel).await
//! # }
//! ```
//!
//! Storing the token, refreshing it and opening the browser are left to the
//! caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;

pub use auth::{AuthError, Authenticator, DeviceAuthenticator, DeviceVerification, ErrorCode, TokenResult};
pub use clock::{Clock, SystemClock};
pub use config::AuthConfig;
pub use error::{Error, Result};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing/logging for an embedding application.
///
/// `RUST_LOG` takes precedence over the default filter. Does nothing if a
/// global subscriber is already installed.
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pscale_auth=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
