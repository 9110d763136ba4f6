use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeviceAuthError;

/// Access/refresh token pair returned by an approved exchange or a refresh.
///
/// The caller owns persistence; this crate never stores it.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use trakt_device_auth::auth::TokenRecord;
///
/// let created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
/// let token = TokenRecord {
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
///     token_type: "bearer".to_string(),
///     scope: "public".to_string(),
///     created_at,
///     expires_at: created_at + Duration::days(90),
/// };
/// assert_eq!(token.lifetime(), Duration::days(90));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub scope: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn lifetime(&self) -> Duration {
        self.expires_at - self.created_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// True when the token expires within `margin` from now; use it to refresh ahead of expiry.
    pub fn expires_within(&self, margin: Duration) -> bool {
        self.expires_at - Utc::now() < margin
    }
}

/// Token payload exactly as the API returns it.
#[derive(Debug, Deserialize)]
pub(crate) struct WireToken {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) expires_in: u32,
    pub(crate) refresh_token: String,
    pub(crate) scope: String,
    /// Seconds since the epoch (UTC).
    pub(crate) created_at: u32,
}

impl WireToken {
    pub(crate) fn validate(&self) -> Result<(), DeviceAuthError> {
        if self.expires_in == 0 {
            return Err(DeviceAuthError::Decode(
                "token response has a zero expires_in".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<WireToken> for TokenRecord {
    fn from(wire: WireToken) -> Self {
        // Any u32 second count lands well inside chrono's range.
        let created_at = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(i64::from(wire.created_at));
        let expires_at = created_at + Duration::seconds(i64::from(wire.expires_in));
        Self {
            access_token: wire.access_token,
            refresh_token: wire.refresh_token,
            token_type: wire.token_type,
            scope: wire.scope,
            created_at,
            expires_at,
        }
    }
}
