//! Error types for the device authorization flow.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::auth::client::Operation;

const INVALID_GRANT_TEXT: &str = "the provided authorization grant is invalid, expired, revoked, does not match the redirection URI used in the authorization request, or was issued to another client";

/// Every outcome of the flow other than a token.
///
/// Classified variants map one-to-one onto remote status codes and keep their
/// own message so callers can tell "user denied" from "code expired".
#[derive(Error, Debug)]
pub enum DeviceAuthError {
    /// 400 on exchange. The only outcome the poll loop retries.
    #[error("the user has not yet claimed the device code")]
    AuthorizationPending,

    /// 401 on refresh.
    #[error("{}", INVALID_GRANT_TEXT)]
    InvalidGrant,

    /// 403 on any operation.
    #[error("invalid API key or unapproved application")]
    Forbidden,

    /// 404 on exchange.
    #[error("invalid device code")]
    InvalidDeviceCode,

    /// 409 on exchange.
    #[error("device code has already been approved")]
    AlreadyApproved,

    /// 410 on exchange.
    #[error("the device code has expired, please regenerate a new one")]
    DeviceCodeExpired,

    /// 418 on exchange.
    #[error("the device code was denied by the user")]
    AccessDenied,

    /// 429 on exchange.
    #[error("the API is being polled too quickly")]
    SlowDown,

    /// 500 on any operation.
    #[error("the API is reporting an internal problem, please check back later")]
    ServerError,

    /// 503 or 504 on any operation.
    #[error("the servers are overloaded (status {status}), please try again in 30 seconds")]
    ServiceOverloaded { status: u16 },

    /// 520, 521 or 522 on any operation.
    #[error("there is an issue with the upstream edge network (status {status})")]
    EdgeNetwork { status: u16 },

    #[error("{operation}: unexpected status code {status}")]
    UnexpectedStatus { operation: Operation, status: u16 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    /// The grant's lifetime elapsed before the user approved it.
    #[error("could not retrieve an access token before the device code expired")]
    DeadlineExceeded,

    #[error("operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for DeviceAuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

impl DeviceAuthError {
    /// HTTP status that produced this error, for classified outcomes.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthorizationPending => Some(400),
            Self::InvalidGrant => Some(401),
            Self::Forbidden => Some(403),
            Self::InvalidDeviceCode => Some(404),
            Self::AlreadyApproved => Some(409),
            Self::DeviceCodeExpired => Some(410),
            Self::AccessDenied => Some(418),
            Self::SlowDown => Some(429),
            Self::ServerError => Some(500),
            Self::ServiceOverloaded { status }
            | Self::EdgeNetwork { status }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(error) => error.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::DeadlineExceeded | Self::Cancelled | Self::Configuration(_) => {
                None
            }
        }
    }

    /// Whether the user simply has not acted on the device code yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::AuthorizationPending)
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthorizationPending => ErrorCategory::Pending,
            Self::InvalidDeviceCode
            | Self::AlreadyApproved
            | Self::DeviceCodeExpired
            | Self::AccessDenied => ErrorCategory::Rejected,
            Self::InvalidGrant | Self::Forbidden => ErrorCategory::Authentication,
            Self::SlowDown => ErrorCategory::RateLimit,
            Self::ServerError | Self::ServiceOverloaded { .. } | Self::EdgeNetwork { .. } => {
                ErrorCategory::Server
            }
            Self::UnexpectedStatus { .. } => ErrorCategory::Api,
            Self::Transport(_) => ErrorCategory::Network,
            Self::Decode(_) => ErrorCategory::Serialization,
            Self::DeadlineExceeded => ErrorCategory::Timeout,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether a caller may reasonably retry the failed operation later.
    ///
    /// The poll loop itself never consults this; it only retries
    /// [`DeviceAuthError::AuthorizationPending`].
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Pending => RecoverySuggestion::KeepPolling,
            ErrorCategory::Rejected | ErrorCategory::Timeout => RecoverySuggestion::RestartFlow,
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit => RecoverySuggestion::ReducePollRate,
            ErrorCategory::Network | ErrorCategory::Server => RecoverySuggestion::RetryLater,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Cancelled => RecoverySuggestion::None,
            ErrorCategory::Api | ErrorCategory::Serialization => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DeviceAuthError>;
