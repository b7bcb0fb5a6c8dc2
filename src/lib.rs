//! Lifecycle helpers for declarative-infrastructure providers.
//!
//! Providers that reconcile declared resources against a cloud control plane
//! all repeat the same two pieces of plumbing:
//!
//! - **Operation waiting**: mutating RPCs (create cluster, update topic,
//!   delete network) return a handle to a long-running server-side
//!   operation; the provider polls it until it is done or failed, bounded by
//!   a timeout and abortable by the host's deadline.
//! - **Graceful removal**: when a read or delete fails, the provider decides
//!   whether to drop the resource from local state, keep it and error, or
//!   propagate the error untouched, guided by the user's three-valued
//!   `allow_deletion` flag and a classification of the transport error.
//!
//! This crate implements both once, against injected capabilities, so
//! resource handlers stay thin.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use controlplane_lifecycle::{LifecycleBuilder, OperationHandle, WaitOptions};
//!
//! // At provider initialization: build one lifecycle per resource kind,
//! // injecting the control-plane client as the operation accessor.
//! let lifecycle = LifecycleBuilder::new("cluster", api_client.clone())
//!     .with_wait_options(WaitOptions::new(Duration::from_secs(1800)))
//!     .with_allow_deletion(config.allow_deletion)
//!     .build();
//!
//! // Create flow: issue the RPC, then wait out the returned operation.
//! let handle = api_client.create_cluster(&spec).await?;
//! let finished = lifecycle.complete(&handle).await?;
//!
//! // Read flow: on error, let the policy decide what happens to state.
//! if let Err(status) = api_client.get_cluster(&id).await {
//!     let outcome = lifecycle.handle_absence(&id, Some(&status), "read cluster");
//!     if outcome.should_remove() {
//!         state.remove(&id);
//!     }
//!     diagnostics.extend(outcome.diagnostics);
//! }
//! ```
//!
//! # Design
//!
//! - The waiter ([`await_operation`]) keeps at most one poll in flight,
//!   spawns nothing, and reports every non-success outcome to the caller.
//! - The removal policy ([`evaluate_removal`]) is a pure decision function;
//!   the caller performs the actual state mutation.
//! - Transport-error classification is a swappable capability
//!   ([`ErrorClassifier`]); the brittle unreachability message heuristics
//!   live in one tested place ([`StatusClassifier`]).
//! - All capabilities are injected at construction time through
//!   [`LifecycleBuilder`]; there is no post-construction configure hook.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod operation;
pub mod removal;
pub mod testing;
pub mod waiter;

// Re-export main types at crate root
pub use classify::{ErrorClassifier, ErrorKind, StatusClassifier};
pub use config::{ConnectionConfig, LifecycleBuilder};
pub use diagnostics::{has_errors, Diagnostic, DiagnosticSeverity};
pub use error::WaitError;
pub use lifecycle::ResourceLifecycle;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use operation::{OperationAccessor, OperationHandle, OperationStatus};
pub use removal::{evaluate_removal, RemovalContext, RemovalDecision, RemovalOutcome, TriState};
pub use waiter::{
    await_operation, await_operation_with_cancel, WaitOptions, DEFAULT_POLL_INTERVAL,
    DEFAULT_TIMEOUT,
};

// Re-export async_trait for convenience when implementing OperationAccessor
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tonic;
pub use tracing;
