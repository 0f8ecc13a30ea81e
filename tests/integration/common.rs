//! Common test utilities.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pscale_auth::{AuthConfig, Clock, DeviceAuthenticator, DeviceVerification};
use serde_json::json;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const CLIENT_ID: &str = "test-client";
pub const AUDIENCE: &str = "https://api.example.com";

/// Clock whose `sleep` returns immediately after moving time forward.
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Arc<Self> {
        Self::starting_at(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
    }

    pub fn starting_at(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(start), sleeps: Mutex::new(Vec::new()) })
    }

    /// Every duration passed to `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::from_std(duration).unwrap();
        }
        self.sleeps.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

/// Responder that replays `script` in order, then repeats `fallback`, and
/// records the fake-clock time of every request it sees.
pub struct ScriptedResponder {
    clock: Arc<FakeClock>,
    script: Mutex<VecDeque<ResponseTemplate>>,
    fallback: ResponseTemplate,
    seen_at: Arc<Mutex<Vec<DateTime<Utc>>>>,
}

impl ScriptedResponder {
    pub fn new(
        clock: Arc<FakeClock>,
        script: Vec<ResponseTemplate>,
        fallback: ResponseTemplate,
    ) -> (Self, Arc<Mutex<Vec<DateTime<Utc>>>>) {
        let seen_at = Arc::new(Mutex::new(Vec::new()));
        let responder = Self {
            clock,
            script: Mutex::new(script.into()),
            fallback,
            seen_at: Arc::clone(&seen_at),
        };
        (responder, seen_at)
    }
}

impl Respond for ScriptedResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.seen_at.lock().unwrap().push(self.clock.now());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn authenticator(server: &MockServer, clock: Arc<FakeClock>) -> DeviceAuthenticator {
    authenticator_at(&server.uri(), clock)
}

pub fn authenticator_at(base_url: &str, clock: Arc<FakeClock>) -> DeviceAuthenticator {
    let config = AuthConfig::new(base_url, CLIENT_ID, AUDIENCE).unwrap();
    DeviceAuthenticator::new(config).unwrap().with_clock(clock)
}

/// A verification for device code `D1` polled every `interval_secs`.
pub fn verification(clock: &FakeClock, interval_secs: u64, expires_in_secs: i64) -> DeviceVerification {
    DeviceVerification::new(
        "D1",
        "U1",
        "https://x/d",
        "https://x/d?c=U1",
        Duration::from_secs(interval_secs),
        clock.now() + chrono::Duration::seconds(expires_in_secs),
    )
}

pub fn oauth_error(status: u16, code: &str, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": code,
        "error_description": description,
    }))
}

pub fn pending() -> ResponseTemplate {
    oauth_error(403, "authorization_pending", "User has yet to authorize device code.")
}

pub fn token(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access_token,
        "refresh_token": "R1",
        "id_token": "I1",
        "expires_in": 86400,
    }))
}
