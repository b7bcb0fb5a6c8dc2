//! Waiting on long-running control-plane operations.
//!
//! Mutating RPCs against the control plane return an operation handle; the
//! actual work completes asynchronously on the server. [`await_operation`]
//! polls the operation at a fixed cadence until it reaches a terminal status
//! or a deadline expires. The loop keeps at most one accessor call in flight
//! and spawns no background work.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

use crate::error::WaitError;
use crate::operation::{OperationAccessor, OperationHandle, OperationStatus};

/// Default cadence between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default overall wait deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Timing parameters for a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Overall deadline for the wait. Must be greater than zero; a zero
    /// timeout still performs the initial poll but times out before any
    /// second one.
    pub timeout: Duration,
    /// Cadence between polls.
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    /// Options with the given timeout and the default poll interval.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Wait until the operation reaches a terminal status or the timeout
/// expires.
///
/// Polls immediately, then at `options.poll_interval`, returning:
///
/// - `Ok(handle)` with the final snapshot once the status is
///   [`Done`](OperationStatus::Done);
/// - [`WaitError::OperationFailed`] once the status is
///   [`Failed`](OperationStatus::Failed), carrying the server detail;
/// - [`WaitError::Accessor`] if a poll itself fails, with the underlying
///   status preserved;
/// - [`WaitError::Timeout`] once `options.timeout` has elapsed;
/// - [`WaitError::InvalidHandle`] without polling at all if the handle has
///   an empty operation id.
pub async fn await_operation<A>(
    accessor: &A,
    handle: &OperationHandle,
    options: WaitOptions,
) -> Result<OperationHandle, WaitError>
where
    A: OperationAccessor + ?Sized,
{
    await_operation_with_cancel(accessor, handle, options, std::future::pending()).await
}

/// Like [`await_operation`], but aborts promptly with
/// [`WaitError::Cancelled`] when `cancel` completes.
///
/// Any future works as the signal: a shutdown receiver, a parent deadline,
/// `tokio::signal::ctrl_c()`. Cancellation wins over an in-flight poll.
pub async fn await_operation_with_cancel<A>(
    accessor: &A,
    handle: &OperationHandle,
    options: WaitOptions,
    cancel: impl Future<Output = ()>,
) -> Result<OperationHandle, WaitError>
where
    A: OperationAccessor + ?Sized,
{
    if handle.id.is_empty() {
        return Err(WaitError::InvalidHandle(
            "operation id is empty".to_string(),
        ));
    }

    tokio::pin!(cancel);
    let deadline = Instant::now() + options.timeout;

    loop {
        let current = tokio::select! {
            biased;
            _ = &mut cancel => return Err(WaitError::Cancelled(handle.id.clone())),
            polled = accessor.get_operation(&handle.id) => polled?,
        };

        match current.status {
            OperationStatus::Done => {
                debug!(operation = %current.id, resource = %current.resource_id, "operation done");
                return Ok(current);
            }
            OperationStatus::Failed => {
                let detail = current
                    .detail
                    .unwrap_or_else(|| "no detail supplied".to_string());
                return Err(WaitError::OperationFailed {
                    id: current.id,
                    detail,
                });
            }
            status => {
                trace!(operation = %current.id, %status, "operation not terminal yet");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout {
                id: handle.id.clone(),
                timeout: options.timeout,
            });
        }

        // Never sleep past the deadline; the final poll lands on it.
        let nap = options.poll_interval.min(deadline - now);
        tokio::select! {
            biased;
            _ = &mut cancel => return Err(WaitError::Cancelled(handle.id.clone())),
            _ = sleep(nap) => {}
        }
    }
}
