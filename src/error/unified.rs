//! Error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The device code is waiting on the user.
    Pending,
    /// The device code can never succeed (invalid, used, expired or denied).
    Rejected,
    Authentication,
    RateLimit,
    Server,
    Network,
    Serialization,
    Timeout,
    Cancelled,
    Configuration,
    Api,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    KeepPolling,
    /// Request a brand-new device code and show it to the user.
    RestartFlow,
    CheckCredentials,
    ReducePollRate,
    RetryLater,
    CheckConfiguration,
    ContactSupport,
    None,
}
