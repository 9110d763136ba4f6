use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DeviceAuthError;

/// Result of starting the flow: what to show the user and how to poll.
///
/// Lives for one authorization attempt; none of it needs to be persisted.
///
/// # Example
/// ```
/// use trakt_device_auth::auth::DeviceCodeGrant;
///
/// let grant = DeviceCodeGrant {
///     device_code: "d9c126a7706328d808914cfd1e40274b6e009f684b1aca271b8b2b4d2b68a6ab".to_string(),
///     user_code: "5055CC52".to_string(),
///     verification_url: "https://trakt.tv/activate".to_string(),
///     expires_in_secs: 600,
///     interval_secs: 5,
/// };
/// assert!(grant.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCodeGrant {
    /// Sent back on every exchange attempt. Never shown to the user.
    pub device_code: String,
    /// Code the user types in at `verification_url`.
    pub user_code: String,
    pub verification_url: String,
    #[serde(rename = "expires_in")]
    pub expires_in_secs: u64,
    #[serde(rename = "interval")]
    pub interval_secs: u64,
}

impl DeviceCodeGrant {
    /// Total lifetime of the device code from issuance.
    pub fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in_secs)
    }

    /// Minimum spacing between exchange attempts.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Upper bound on exchange attempts before the code expires.
    pub fn max_attempts(&self) -> u64 {
        self.expires_in_secs
            .checked_div(self.interval_secs)
            .unwrap_or(0)
    }

    /// Reject grants whose timing parameters cannot drive a poll loop.
    pub fn validate(&self) -> Result<(), DeviceAuthError> {
        if self.expires_in_secs == 0 {
            return Err(DeviceAuthError::Decode(
                "device code grant has a zero expires_in".to_string(),
            ));
        }
        if self.interval_secs == 0 {
            return Err(DeviceAuthError::Decode(
                "device code grant has a zero polling interval".to_string(),
            ));
        }
        Ok(())
    }
}
