//! Poll loop driving device-code exchanges until the user decides.
//!
//! The loop waits one interval, makes one exchange attempt, and repeats while
//! the code is merely unclaimed. A deadline fixed at entry (now + the grant's
//! lifetime) ends the loop, and the caller's cancellation token ends it sooner.
//! When several events are ready together, cancellation beats the deadline and
//! the deadline beats the interval tick.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::client::DeviceAuthClient;
use crate::auth::device_code::DeviceCodeGrant;
use crate::auth::token::TokenRecord;
use crate::error::DeviceAuthError;

/// One exchange attempt of a device code for a token.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, grant: &DeviceCodeGrant) -> Result<TokenRecord, DeviceAuthError>;
}

#[async_trait]
impl TokenExchange for DeviceAuthClient {
    async fn exchange(&self, grant: &DeviceCodeGrant) -> Result<TokenRecord, DeviceAuthError> {
        self.exchange_code_for_token(grant).await
    }
}

/// What a single attempt means for the loop.
#[derive(Debug)]
pub enum AttemptOutcome {
    Succeeded(TokenRecord),
    /// Code not yet claimed; wait another interval.
    Pending,
    Fatal(DeviceAuthError),
}

impl From<Result<TokenRecord, DeviceAuthError>> for AttemptOutcome {
    fn from(result: Result<TokenRecord, DeviceAuthError>) -> Self {
        match result {
            Ok(token) => Self::Succeeded(token),
            Err(DeviceAuthError::AuthorizationPending) => Self::Pending,
            Err(error) => Self::Fatal(error),
        }
    }
}

/// Poll `exchange` until it yields a token, a non-retryable error, the
/// grant's lifetime runs out, or `cancel` fires.
///
/// Returns [`DeviceAuthError::DeadlineExceeded`] on expiry and
/// [`DeviceAuthError::Cancelled`] on cancellation; any other error is the
/// classified outcome of the last attempt, unchanged.
pub async fn poll_for_token<E>(
    exchange: &E,
    grant: &DeviceCodeGrant,
    cancel: &CancellationToken,
) -> Result<TokenRecord, DeviceAuthError>
where
    E: TokenExchange + ?Sized,
{
    grant.validate()?;

    let interval = grant.interval();
    let deadline = sleep_until(deadline_after(Instant::now(), grant.expires_in()));
    tokio::pin!(deadline);

    let mut attempt: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(attempts = attempt, "device code polling cancelled");
                return Err(DeviceAuthError::Cancelled);
            }
            _ = &mut deadline => {
                debug!(attempts = attempt, "device code expired while waiting");
                return Err(DeviceAuthError::DeadlineExceeded);
            }
            _ = sleep(interval) => {}
        }

        attempt += 1;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(attempt, "device code polling cancelled mid-attempt");
                return Err(DeviceAuthError::Cancelled);
            }
            _ = &mut deadline => {
                debug!(attempt, "device code expired mid-attempt");
                return Err(DeviceAuthError::DeadlineExceeded);
            }
            result = exchange.exchange(grant) => result,
        };

        match AttemptOutcome::from(result) {
            AttemptOutcome::Succeeded(token) => {
                info!(attempts = attempt, "device code authorized");
                return Ok(token);
            }
            AttemptOutcome::Pending => {
                debug!(attempt, "device code not yet claimed");
            }
            AttemptOutcome::Fatal(error) => {
                warn!(attempt, error = %error, "device code polling failed");
                return Err(error);
            }
        }
    }
}

/// Roughly 30 years, the same horizon tokio uses for an unbounded sleep.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + lifetime`, saturating to a far-future instant when the sum
/// does not fit in an `Instant`.
fn deadline_after(start: Instant, lifetime: Duration) -> Instant {
    start
        .checked_add(lifetime)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}
