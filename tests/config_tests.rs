//! Tests for configuration loading.

mod auth_support;

use std::time::Duration;

use auth_support::ScopedEnv;
use trakt_device_auth::config::{DeviceAuthConfig, DEFAULT_BASE_URL, STAGING_BASE_URL};
use trakt_device_auth::error::DeviceAuthError;

const CONFIG_ENV_VARS: [&str; 3] = [
    "TRAKT_API_BASE_URL",
    "TRAKT_API_STAGING",
    "TRAKT_REQUEST_TIMEOUT_SECS",
];

fn clean_env() -> ScopedEnv {
    ScopedEnv::cleared(&CONFIG_ENV_VARS)
}

#[test]
fn config_from_env_defaults_to_production() {
    let _env = clean_env();

    let config = DeviceAuthConfig::from_env().unwrap();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
fn config_from_env_staging_flag_selects_staging_host() {
    let env = clean_env();
    env.set("TRAKT_API_STAGING", "true");

    let config = DeviceAuthConfig::from_env().unwrap();

    assert_eq!(config.base_url, STAGING_BASE_URL);
}

#[test]
fn config_from_env_explicit_base_url_beats_staging_flag() {
    let env = clean_env();
    env.set("TRAKT_API_STAGING", "1");
    env.set("TRAKT_API_BASE_URL", "http://localhost:9999");

    let config = DeviceAuthConfig::from_env().unwrap();

    assert_eq!(config.base_url, "http://localhost:9999");
    assert_eq!(
        config.endpoint("/oauth/device/code"),
        "http://localhost:9999/oauth/device/code"
    );
}

#[test]
fn config_from_env_reads_request_timeout() {
    let env = clean_env();
    env.set("TRAKT_REQUEST_TIMEOUT_SECS", "5");

    let config = DeviceAuthConfig::from_env().unwrap();

    assert_eq!(config.request_timeout, Duration::from_secs(5));
}

#[test]
fn config_from_env_rejects_bad_values() {
    let env = clean_env();
    env.set("TRAKT_REQUEST_TIMEOUT_SECS", "soon");
    let err = DeviceAuthConfig::from_env().unwrap_err();
    match err {
        DeviceAuthError::Configuration(message) => {
            assert!(message.contains("TRAKT_REQUEST_TIMEOUT_SECS"))
        }
        other => panic!("expected configuration error, got {other:?}"),
    }

    std::env::remove_var("TRAKT_REQUEST_TIMEOUT_SECS");
    env.set("TRAKT_API_STAGING", "sometimes");
    assert!(matches!(
        DeviceAuthConfig::from_env(),
        Err(DeviceAuthError::Configuration(_))
    ));
}
