//! Per-resource composition of the waiter and the removal policy.
//!
//! Every resource handler follows the same two seams: create/update issue a
//! mutating RPC and then wait on the returned operation; read/delete hit an
//! error and then decide what to do with local state. [`ResourceLifecycle`]
//! carries the capabilities both seams need, injected once at assembly time
//! via [`LifecycleBuilder`](crate::config::LifecycleBuilder) rather than
//! populated later by a runtime configure hook.

use std::future::Future;
use std::sync::Arc;

use tonic::Status;
use tracing::{debug, info, warn};

use crate::classify::ErrorClassifier;
use crate::diagnostics::Diagnostic;
use crate::error::WaitError;
use crate::operation::{OperationAccessor, OperationHandle};
use crate::removal::{evaluate_removal, RemovalContext, RemovalOutcome, TriState};
use crate::waiter::{await_operation_with_cancel, WaitOptions};

/// Lifecycle helper for one resource kind.
///
/// Holds the injected operation accessor, error classifier, wait timing and
/// `allow_deletion` setting. Construct via
/// [`LifecycleBuilder`](crate::config::LifecycleBuilder).
pub struct ResourceLifecycle<A> {
    kind: String,
    accessor: A,
    classifier: Arc<dyn ErrorClassifier>,
    wait: WaitOptions,
    allow_deletion: TriState,
}

impl<A: OperationAccessor> ResourceLifecycle<A> {
    pub(crate) fn new(
        kind: String,
        accessor: A,
        classifier: Arc<dyn ErrorClassifier>,
        wait: WaitOptions,
        allow_deletion: TriState,
    ) -> Self {
        Self {
            kind,
            accessor,
            classifier,
            wait,
            allow_deletion,
        }
    }

    /// The resource kind this lifecycle was built for.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The injected operation accessor.
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// The configured `allow_deletion` setting.
    pub fn allow_deletion(&self) -> TriState {
        self.allow_deletion
    }

    /// Wait for the operation returned by a mutating RPC to finish.
    pub async fn complete(&self, handle: &OperationHandle) -> Result<OperationHandle, WaitError> {
        self.complete_with_cancel(handle, std::future::pending())
            .await
    }

    /// Like [`complete`](Self::complete), aborting when `cancel` fires so a
    /// parent deadline can cut the wait short.
    pub async fn complete_with_cancel(
        &self,
        handle: &OperationHandle,
        cancel: impl Future<Output = ()>,
    ) -> Result<OperationHandle, WaitError> {
        debug!(resource_kind = %self.kind, operation = %handle.id, "waiting for operation");
        let result =
            await_operation_with_cancel(&self.accessor, handle, self.wait, cancel).await;
        match &result {
            Ok(op) => {
                info!(
                    resource_kind = %self.kind,
                    resource = %op.resource_id,
                    operation = %op.id,
                    "operation completed"
                );
            }
            Err(err) => {
                warn!(
                    resource_kind = %self.kind,
                    operation = %handle.id,
                    error = %err,
                    "operation did not complete"
                );
            }
        }
        result
    }

    /// Render a wait failure as the error diagnostic a plugin framework
    /// surfaces to the operator.
    pub fn wait_error_diagnostic(&self, operation: &str, err: &WaitError) -> Diagnostic {
        Diagnostic::error(format!("{} for {} did not complete", operation, self.kind))
            .with_detail(err.to_string())
    }

    /// Apply the removal policy after a failed read or delete.
    ///
    /// The returned outcome tells the caller whether to drop the resource
    /// from local state; this helper never mutates state itself.
    pub fn handle_absence(
        &self,
        resource_id: &str,
        error: Option<&Status>,
        operation: &str,
    ) -> RemovalOutcome {
        let ctx = RemovalContext {
            resource_kind: &self.kind,
            resource_id,
            allow_deletion: self.allow_deletion,
            operation,
        };
        let outcome = evaluate_removal(&ctx, error, self.classifier.as_ref());
        debug!(
            resource_kind = %self.kind,
            resource_id,
            decision = ?outcome.decision,
            "removal policy evaluated"
        );
        outcome
    }
}
