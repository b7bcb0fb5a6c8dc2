//! Operation handles and the accessor capability.
//!
//! Control planes accept mutating requests (create cluster, update topic,
//! delete network) and return a handle to a server-tracked asynchronous
//! operation. The handle is owned by the remote system; this crate only
//! observes it by re-fetching through an [`OperationAccessor`] until the
//! operation reaches a terminal status.

use serde::{Deserialize, Serialize};

/// Completion status of a server-side asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Accepted by the control plane but not yet started.
    Pending,
    /// Currently executing.
    Running,
    /// Completed successfully.
    Done,
    /// Completed with a failure; the handle carries the server detail.
    Failed,
    /// The control plane reported a status this crate does not recognize.
    Unknown,
}

impl OperationStatus {
    /// Whether this status ends the wait ([`Done`](Self::Done) or
    /// [`Failed`](Self::Failed)).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A snapshot of a server-tracked asynchronous operation.
///
/// Transitions are driven entirely by the remote system; each poll through an
/// [`OperationAccessor`] yields a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationHandle {
    /// Opaque operation identifier assigned by the control plane.
    pub id: String,
    /// Identifier of the resource the operation targets.
    pub resource_id: String,
    /// Status at the time the snapshot was taken.
    pub status: OperationStatus,
    /// Server-supplied detail, populated when the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl OperationHandle {
    /// Create a handle for the given operation and target resource.
    pub fn new(
        id: impl Into<String>,
        resource_id: impl Into<String>,
        status: OperationStatus,
    ) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            status,
            detail: None,
        }
    }

    /// Attach a server-supplied detail string.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Capability to fetch the current state of an operation by id.
///
/// Supplied by the control-plane API client; typically a thin wrapper over a
/// `GetOperation` RPC. Implementations decide their own retry behavior for
/// transient transport failures; the waiter treats every error as final for
/// the current wait.
#[async_trait::async_trait]
pub trait OperationAccessor: Send + Sync {
    /// Fetch the operation with the given id.
    async fn get_operation(&self, id: &str) -> Result<OperationHandle, tonic::Status>;
}
