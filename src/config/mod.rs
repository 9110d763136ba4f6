//! Configuration (layered: code > env > defaults).

use std::fmt;
use std::time::Duration;

use bon::Builder;

use crate::error::DeviceAuthError;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.trakt.tv";

/// Staging API host.
pub const STAGING_BASE_URL: &str = "https://api-staging.trakt.tv";

/// Header carrying the protocol version on every request.
pub const API_VERSION_HEADER: &str = "trakt-api-version";

/// Protocol version spoken by this crate.
pub const API_VERSION: &str = "2";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("trakt-device-auth/", env!("CARGO_PKG_VERSION"));

const ENV_BASE_URL: &str = "TRAKT_API_BASE_URL";
const ENV_STAGING: &str = "TRAKT_API_STAGING";
const ENV_REQUEST_TIMEOUT_SECS: &str = "TRAKT_REQUEST_TIMEOUT_SECS";

/// Transport settings for [`DeviceAuthClient`](crate::auth::DeviceAuthClient).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use trakt_device_auth::config::DeviceAuthConfig;
///
/// let config = DeviceAuthConfig::builder()
///     .base_url("https://api-staging.trakt.tv".to_string())
///     .request_timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.endpoint("/oauth/token"), "https://api-staging.trakt.tv/oauth/token");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DeviceAuthConfig {
    #[builder(default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(default = API_VERSION.to_string())]
    pub api_version: String,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
}

impl Default for DeviceAuthConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DeviceAuthConfig {
    /// Config targeting the staging environment.
    pub fn staging() -> Self {
        Self::builder().base_url(STAGING_BASE_URL.to_string()).build()
    }

    /// Load from environment variables (`TRAKT_API_BASE_URL`, `TRAKT_API_STAGING`,
    /// `TRAKT_REQUEST_TIMEOUT_SECS`), reading `.env` first if present.
    ///
    /// An explicit base URL wins over the staging flag.
    pub fn from_env() -> Result<Self, DeviceAuthError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Ok(flag) = std::env::var(ENV_STAGING) {
            if parse_flag(&flag).ok_or_else(|| {
                DeviceAuthError::Configuration(format!("{ENV_STAGING} is not a boolean: {flag}"))
            })? {
                config.base_url = STAGING_BASE_URL.to_string();
            }
        }

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }

        if let Ok(secs) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DeviceAuthError::Configuration(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} is not a number of seconds: {secs}"
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Application credentials from the developer dashboard.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}
