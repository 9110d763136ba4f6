//! OAuth2 device authorization flow for the Trakt API.
//!
//! Request a device code, show the user where to enter it, then poll until
//! they approve it, the code expires, or the API rejects the attempt.
//! Storing the resulting token is left to the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use trakt_device_auth::prelude::*;
//!
//! # async fn example() -> trakt_device_auth::error::Result<()> {
//! let client = DeviceAuthClient::new(
//!     DeviceAuthConfig::from_env()?,
//!     ClientCredentials::new("client-id", "client-secret"),
//! )?;
//! let grant = client.request_device_code().await?;
//! println!("Visit {} and enter {}", grant.verification_url, grant.user_code);
//!
//! let cancel = CancellationToken::new();
//! match client.poll_for_token_with_cancel(&grant, &cancel).await {
//!     Ok(token) => println!("access token expires at {}", token.expires_at),
//!     Err(DeviceAuthError::AccessDenied) => println!("denied"),
//!     Err(other) => return Err(other),
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod prelude;
pub mod util;
