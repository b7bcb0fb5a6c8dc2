//! Error types for operation waiting.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by the operation waiter.
///
/// Every non-success outcome of a wait is reported to the caller; the waiter
/// never swallows or downgrades errors. Callers surface these as error
/// diagnostics and abort the resource operation.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The handle cannot be polled (e.g., empty operation id).
    #[error("invalid operation handle: {0}")]
    InvalidHandle(String),

    /// The operation accessor itself failed. The underlying status is
    /// preserved untouched; transient and permanent failures are not
    /// distinguished here.
    #[error("operation lookup failed: {0}")]
    Accessor(#[from] tonic::Status),

    /// The operation reached the failed status on the server.
    #[error("operation {id} failed: {detail}")]
    OperationFailed {
        /// The operation id.
        id: String,
        /// Server-supplied failure detail.
        detail: String,
    },

    /// The operation did not reach a terminal status within the timeout.
    #[error("timed out after {timeout:?} waiting for operation {id}")]
    Timeout {
        /// The operation id.
        id: String,
        /// The configured timeout.
        timeout: Duration,
    },

    /// The caller's cancellation signal fired before the operation finished.
    #[error("wait for operation {0} was cancelled")]
    Cancelled(String),
}

impl From<WaitError> for tonic::Status {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::InvalidHandle(msg) => tonic::Status::invalid_argument(msg),
            WaitError::Accessor(status) => status,
            err @ WaitError::OperationFailed { .. } => tonic::Status::aborted(err.to_string()),
            err @ WaitError::Timeout { .. } => tonic::Status::deadline_exceeded(err.to_string()),
            err @ WaitError::Cancelled(_) => tonic::Status::cancelled(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WaitError::InvalidHandle("operation id is empty".to_string());
        assert_eq!(
            format!("{}", err),
            "invalid operation handle: operation id is empty"
        );

        let err = WaitError::OperationFailed {
            id: "op-7".to_string(),
            detail: "disk full".to_string(),
        };
        assert_eq!(format!("{}", err), "operation op-7 failed: disk full");

        let err = WaitError::Cancelled("op-7".to_string());
        assert_eq!(format!("{}", err), "wait for operation op-7 was cancelled");
    }

    #[test]
    fn test_error_to_status() {
        let err = WaitError::InvalidHandle("empty".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let err = WaitError::Timeout {
            id: "op-1".to_string(),
            timeout: Duration::from_secs(5),
        };
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::DeadlineExceeded);

        let err = WaitError::Cancelled("op-1".to_string());
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::Cancelled);

        let err = WaitError::OperationFailed {
            id: "op-1".to_string(),
            detail: "boom".to_string(),
        };
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::Aborted);
    }

    #[test]
    fn test_accessor_status_preserved() {
        let err = WaitError::from(tonic::Status::unavailable("name resolver error"));
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(status.message(), "name resolver error");
    }
}
