//! Cancellation helper.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::DeviceAuthError;

/// Run a future to completion unless `cancel` fires first.
///
/// Cancellation wins when both are ready; the losing future is dropped.
pub async fn run_until_cancelled<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = T>,
) -> Result<T, DeviceAuthError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DeviceAuthError::Cancelled),
        output = future => Ok(output),
    }
}
