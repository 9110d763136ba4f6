//! Convenience re-exports.

pub use crate::auth::{
    poll_for_token, AttemptOutcome, DeviceAuthClient, DeviceCodeGrant, Operation, TokenExchange,
    TokenRecord,
};
pub use crate::config::{ClientCredentials, DeviceAuthConfig};
pub use crate::error::{DeviceAuthError, ErrorCategory, RecoverySuggestion, Result};
pub use tokio_util::sync::CancellationToken;
