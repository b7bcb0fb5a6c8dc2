//! Testing utilities for lifecycle call sites.
//!
//! This module provides a scripted [`OperationAccessor`] so waiter and
//! lifecycle code can be tested without a control plane, plus constructors
//! for the handle and status shapes the policy code classifies.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use controlplane_lifecycle::testing::{self, ScriptedAccessor};
//! use controlplane_lifecycle::{await_operation, OperationHandle, OperationStatus, WaitOptions};
//!
//! # tokio_test::block_on(async {
//! let accessor = ScriptedAccessor::new()
//!     .then_ok(testing::running_operation("op-1", "cluster-1"))
//!     .then_ok(testing::done_operation("op-1", "cluster-1"));
//!
//! let options = WaitOptions::new(Duration::from_secs(5))
//!     .with_poll_interval(Duration::from_millis(10));
//! let handle = OperationHandle::new("op-1", "cluster-1", OperationStatus::Pending);
//! let finished = await_operation(&accessor, &handle, options).await.unwrap();
//!
//! assert_eq!(finished.status, OperationStatus::Done);
//! assert_eq!(accessor.polls(), 2);
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tonic::{Code, Status};

use crate::operation::{OperationAccessor, OperationHandle, OperationStatus};

enum ScriptedPoll {
    Ok(OperationHandle),
    // Status is rebuilt per poll so the script stays Clone-free.
    Err(Code, String),
}

/// An [`OperationAccessor`] that replays a queued script of poll responses.
///
/// Each `get_operation` call pops the next scripted response. Once the
/// script is exhausted, a repeating handle (if configured via
/// [`repeating`](Self::repeating)) is returned indefinitely; otherwise the
/// accessor fails with an internal status.
pub struct ScriptedAccessor {
    script: Mutex<VecDeque<ScriptedPoll>>,
    repeat: Option<OperationHandle>,
    polls: AtomicUsize,
}

impl ScriptedAccessor {
    /// An accessor with an empty script.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat: None,
            polls: AtomicUsize::new(0),
        }
    }

    /// An accessor that returns `handle` on every poll once the script is
    /// exhausted. Useful for operations that never become terminal.
    pub fn repeating(handle: OperationHandle) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat: Some(handle),
            polls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful poll response.
    pub fn then_ok(self, handle: OperationHandle) -> Self {
        self.lock_script().push_back(ScriptedPoll::Ok(handle));
        self
    }

    /// Queue a failing poll response with the given status code and message.
    pub fn then_err(self, code: Code, message: impl Into<String>) -> Self {
        self.lock_script()
            .push_back(ScriptedPoll::Err(code, message.into()));
        self
    }

    /// How many times `get_operation` has been called.
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<ScriptedPoll>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ScriptedAccessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl OperationAccessor for ScriptedAccessor {
    async fn get_operation(&self, _id: &str) -> Result<OperationHandle, Status> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.lock_script().pop_front();
        match next {
            Some(ScriptedPoll::Ok(handle)) => Ok(handle),
            Some(ScriptedPoll::Err(code, message)) => Err(Status::new(code, message)),
            None => match &self.repeat {
                Some(handle) => Ok(handle.clone()),
                None => Err(Status::internal("scripted accessor exhausted")),
            },
        }
    }
}

/// A handle in the running status.
pub fn running_operation(id: &str, resource_id: &str) -> OperationHandle {
    OperationHandle::new(id, resource_id, OperationStatus::Running)
}

/// A handle in the done status.
pub fn done_operation(id: &str, resource_id: &str) -> OperationHandle {
    OperationHandle::new(id, resource_id, OperationStatus::Done)
}

/// A handle in the failed status carrying a server detail.
pub fn failed_operation(id: &str, resource_id: &str, detail: &str) -> OperationHandle {
    OperationHandle::new(id, resource_id, OperationStatus::Failed).with_detail(detail)
}

/// A status the default classifier reads as not-found.
pub fn not_found_status(message: &str) -> Status {
    Status::not_found(message)
}

/// A status the default classifier reads as permission-denied.
pub fn permission_denied_status(message: &str) -> Status {
    Status::permission_denied(message)
}

/// A status the default classifier reads as cluster-unreachable via its
/// message text rather than its code.
pub fn unreachable_status() -> Status {
    Status::internal("transport error: name resolver error: produced zero addresses")
}
