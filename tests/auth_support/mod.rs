#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use serde_json::{json, Value};
use trakt_device_auth::auth::{DeviceAuthClient, DeviceCodeGrant};
use trakt_device_auth::config::{ClientCredentials, DeviceAuthConfig};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "client-id-123";
pub const CLIENT_SECRET: &str = "client-secret-456";

pub fn client(server: &MockServer) -> DeviceAuthClient {
    let config = DeviceAuthConfig::builder().base_url(server.uri()).build();
    DeviceAuthClient::new(config, ClientCredentials::new(CLIENT_ID, CLIENT_SECRET))
        .expect("build client")
}

pub fn grant(device_code: &str, expires_in_secs: u64, interval_secs: u64) -> DeviceCodeGrant {
    DeviceCodeGrant {
        device_code: device_code.to_string(),
        user_code: "5055CC52".to_string(),
        verification_url: "https://trakt.tv/activate".to_string(),
        expires_in_secs,
        interval_secs,
    }
}

pub fn token_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 7_776_000,
        "refresh_token": "RT",
        "scope": "public",
        "created_at": 1_700_000_000
    })
}

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Serializes tests that touch process environment variables.
///
/// Clears `keys` on creation and puts back their previous values on drop.
pub struct ScopedEnv {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    pub fn cleared(keys: &[&'static str]) -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = keys
            .iter()
            .map(|&key| {
                let value = std::env::var(key).ok();
                std::env::remove_var(key);
                (key, value)
            })
            .collect();
        Self {
            previous,
            _lock: lock,
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}
