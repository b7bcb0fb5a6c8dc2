//! Graceful removal policy.
//!
//! When a read or delete against the control plane fails, the provider has to
//! decide whether the local state entry should be dropped, kept, or whether
//! the error is none of this policy's business. The decision depends on how
//! the error classifies and on the user's `allow_deletion` setting: dropping
//! state silently loses track of a resource that may still exist, so users
//! can opt out of it per resource.
//!
//! [`evaluate_removal`] is a pure function. It only classifies and decides;
//! the caller performs the actual state removal or error surfacing.

use serde::{Deserialize, Serialize};
use tonic::Status;

use crate::classify::{ErrorClassifier, ErrorKind};
use crate::diagnostics::Diagnostic;

/// Three-valued `allow_deletion` preference.
///
/// Declarative configurations distinguish "the user never set this" from an
/// explicit `true` or `false`. An unset flag is treated as permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    /// Not set by the user.
    #[default]
    Unset,
    /// Explicitly enabled.
    True,
    /// Explicitly disabled.
    False,
}

impl TriState {
    /// Whether this setting permits dropping the resource from state.
    /// Only an explicit `false` refuses.
    pub fn permits_deletion(self) -> bool {
        !matches!(self, TriState::False)
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => TriState::Unset,
            Some(true) => TriState::True,
            Some(false) => TriState::False,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

/// The outcome of policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalDecision {
    /// Drop the resource from local state.
    RemoveFromState,
    /// Keep the resource in state and surface an error.
    KeepInState,
    /// The error is not one this policy handles; propagate it.
    ErrorNotHandled,
}

/// Identity and setting inputs for one policy evaluation.
#[derive(Debug, Clone)]
pub struct RemovalContext<'a> {
    /// Resource kind, e.g. `"topic"` or `"cluster"`. Appears verbatim in
    /// every diagnostic produced.
    pub resource_kind: &'a str,
    /// Resource identifier. Appears verbatim in every diagnostic produced.
    pub resource_id: &'a str,
    /// The user's `allow_deletion` setting.
    pub allow_deletion: TriState,
    /// Label for the operation that failed, e.g. `"find pipeline"`. Used
    /// when wrapping errors this policy does not handle.
    pub operation: &'a str,
}

/// Decision plus the diagnostics to surface for it.
///
/// Each evaluation produces exactly one of: no diagnostics, one warning, or
/// one error.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalOutcome {
    /// What the caller should do with the local state entry.
    pub decision: RemovalDecision,
    /// Diagnostics to hand to the plugin framework.
    pub diagnostics: Vec<Diagnostic>,
}

impl RemovalOutcome {
    fn new(decision: RemovalDecision, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            decision,
            diagnostics,
        }
    }

    /// Whether the caller should drop the resource from state.
    pub fn should_remove(&self) -> bool {
        self.decision == RemovalDecision::RemoveFromState
    }
}

/// Decide whether a resource should be dropped from local state after a
/// failed read or delete.
///
/// Decision table, first match wins ("permissive" means `allow_deletion` is
/// unset or `true`):
///
/// | error               | permissive                      | `false`                  |
/// |---------------------|---------------------------------|--------------------------|
/// | none                | remove, silent                  | keep, error              |
/// | not found           | remove, silent                  | keep, error              |
/// | cluster unreachable | remove, warning                 | keep, error              |
/// | permission denied   | remove, warning                 | keep, error              |
/// | anything else       | not handled, error (both branches)                         |
///
/// Unclassified errors are never downgraded; they come back wrapped with the
/// operation label and resource identity so the caller can surface them as a
/// hard failure.
///
/// # Example
///
/// ```
/// use controlplane_lifecycle::classify::StatusClassifier;
/// use controlplane_lifecycle::removal::{
///     evaluate_removal, RemovalContext, RemovalDecision, TriState,
/// };
///
/// let ctx = RemovalContext {
///     resource_kind: "topic",
///     resource_id: "my-topic",
///     allow_deletion: TriState::Unset,
///     operation: "find topic",
/// };
/// let gone = tonic::Status::not_found("topic my-topic does not exist");
/// let outcome = evaluate_removal(&ctx, Some(&gone), &StatusClassifier);
///
/// assert_eq!(outcome.decision, RemovalDecision::RemoveFromState);
/// assert!(outcome.diagnostics.is_empty());
/// ```
pub fn evaluate_removal(
    ctx: &RemovalContext<'_>,
    error: Option<&Status>,
    classifier: &dyn ErrorClassifier,
) -> RemovalOutcome {
    match error {
        None => missing_remotely(ctx),
        Some(status) => match classifier.classify(status) {
            ErrorKind::NotFound => missing_remotely(ctx),
            ErrorKind::ClusterUnreachable => unreachable(ctx),
            ErrorKind::PermissionDenied => permission_denied(ctx),
            ErrorKind::Unknown => not_handled(ctx, status),
        },
    }
}

/// The resource is confirmed (or presumed) gone on the remote side.
fn missing_remotely(ctx: &RemovalContext<'_>) -> RemovalOutcome {
    if ctx.allow_deletion.permits_deletion() {
        RemovalOutcome::new(RemovalDecision::RemoveFromState, Vec::new())
    } else {
        RemovalOutcome::new(RemovalDecision::KeepInState, vec![refusal(ctx)])
    }
}

fn unreachable(ctx: &RemovalContext<'_>) -> RemovalOutcome {
    if ctx.allow_deletion.permits_deletion() {
        RemovalOutcome::new(
            RemovalDecision::RemoveFromState,
            vec![Diagnostic::warning(format!(
                "{} {}: cluster unreachable; resource may still exist remotely",
                ctx.resource_kind, ctx.resource_id
            ))],
        )
    } else {
        RemovalOutcome::new(
            RemovalDecision::KeepInState,
            vec![Diagnostic::error(format!(
                "{} {}: cluster unreachable; set allow_deletion = true to \
                 remove despite unreachable cluster",
                ctx.resource_kind, ctx.resource_id
            ))],
        )
    }
}

fn permission_denied(ctx: &RemovalContext<'_>) -> RemovalOutcome {
    if ctx.allow_deletion.permits_deletion() {
        RemovalOutcome::new(
            RemovalDecision::RemoveFromState,
            vec![Diagnostic::warning(format!(
                "{} {}: permission denied reading remote resource; removing from state",
                ctx.resource_kind, ctx.resource_id
            ))],
        )
    } else {
        RemovalOutcome::new(
            RemovalDecision::KeepInState,
            vec![Diagnostic::error(format!(
                "{} {}: permission denied and allow_deletion is false; \
                 refusing to remove from state",
                ctx.resource_kind, ctx.resource_id
            ))],
        )
    }
}

fn not_handled(ctx: &RemovalContext<'_>, status: &Status) -> RemovalOutcome {
    RemovalOutcome::new(
        RemovalDecision::ErrorNotHandled,
        vec![Diagnostic::error(format!(
            "{} failed for {} {}",
            ctx.operation, ctx.resource_kind, ctx.resource_id
        ))
        .with_detail(status.message().to_string())],
    )
}

fn refusal(ctx: &RemovalContext<'_>) -> Diagnostic {
    Diagnostic::error(format!(
        "{} {}: allow_deletion is false; refusing to remove from state",
        ctx.resource_kind, ctx.resource_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::StatusClassifier;
    use crate::diagnostics::DiagnosticSeverity;

    fn ctx(allow_deletion: TriState) -> RemovalContext<'static> {
        RemovalContext {
            resource_kind: "cluster",
            resource_id: "cl-1",
            allow_deletion,
            operation: "read cluster",
        }
    }

    fn eval(allow_deletion: TriState, error: Option<&Status>) -> RemovalOutcome {
        evaluate_removal(&ctx(allow_deletion), error, &StatusClassifier)
    }

    fn single_error(outcome: &RemovalOutcome) -> &Diagnostic {
        assert_eq!(outcome.diagnostics.len(), 1);
        let diag = &outcome.diagnostics[0];
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        diag
    }

    fn single_warning(outcome: &RemovalOutcome) -> &Diagnostic {
        assert_eq!(outcome.diagnostics.len(), 1);
        let diag = &outcome.diagnostics[0];
        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
        diag
    }

    #[test]
    fn test_tristate() {
        assert!(TriState::Unset.permits_deletion());
        assert!(TriState::True.permits_deletion());
        assert!(!TriState::False.permits_deletion());

        assert_eq!(TriState::from(None), TriState::Unset);
        assert_eq!(TriState::from(Some(true)), TriState::True);
        assert_eq!(TriState::from(Some(false)), TriState::False);
        assert_eq!(TriState::from(true), TriState::True);
        assert_eq!(TriState::default(), TriState::Unset);
    }

    #[test]
    fn test_not_found_permissive_removes_silently() {
        let gone = Status::not_found("no such cluster");
        for allow in [TriState::Unset, TriState::True] {
            let outcome = eval(allow, Some(&gone));
            assert_eq!(outcome.decision, RemovalDecision::RemoveFromState);
            assert!(outcome.should_remove());
            assert!(outcome.diagnostics.is_empty());
        }
    }

    #[test]
    fn test_not_found_refused_keeps_state() {
        let gone = Status::not_found("no such cluster");
        let outcome = eval(TriState::False, Some(&gone));
        assert_eq!(outcome.decision, RemovalDecision::KeepInState);
        let diag = single_error(&outcome);
        assert!(diag.summary.contains("allow_deletion is false"));
        assert!(diag.summary.contains("cluster"));
        assert!(diag.summary.contains("cl-1"));
    }

    #[test]
    fn test_nil_error_behaves_like_not_found() {
        let outcome = eval(TriState::Unset, None);
        assert_eq!(outcome.decision, RemovalDecision::RemoveFromState);
        assert!(outcome.diagnostics.is_empty());

        let outcome = eval(TriState::False, None);
        assert_eq!(outcome.decision, RemovalDecision::KeepInState);
        assert!(single_error(&outcome)
            .summary
            .contains("allow_deletion is false"));
    }

    #[test]
    fn test_unreachable_permissive_warns() {
        let down = Status::unavailable("name resolver error");
        for allow in [TriState::Unset, TriState::True] {
            let outcome = eval(allow, Some(&down));
            assert_eq!(outcome.decision, RemovalDecision::RemoveFromState);
            let diag = single_warning(&outcome);
            assert!(diag.summary.contains("cluster unreachable"));
            assert!(diag.summary.contains("cl-1"));
        }
    }

    #[test]
    fn test_unreachable_refused_errors() {
        let down = Status::unavailable("connection refused");
        let outcome = eval(TriState::False, Some(&down));
        assert_eq!(outcome.decision, RemovalDecision::KeepInState);
        let diag = single_error(&outcome);
        assert!(diag.summary.contains("set allow_deletion = true"));
    }

    #[test]
    fn test_permission_denied_branches() {
        let denied = Status::permission_denied("token lacks admin scope");

        let outcome = eval(TriState::Unset, Some(&denied));
        assert_eq!(outcome.decision, RemovalDecision::RemoveFromState);
        assert!(single_warning(&outcome)
            .summary
            .contains("permission denied"));

        let outcome = eval(TriState::False, Some(&denied));
        assert_eq!(outcome.decision, RemovalDecision::KeepInState);
        assert!(single_error(&outcome).summary.contains("permission denied"));
    }

    #[test]
    fn test_unclassified_never_downgraded() {
        let odd = Status::internal("etcd lease expired");
        for allow in [TriState::Unset, TriState::True, TriState::False] {
            let outcome = eval(allow, Some(&odd));
            assert_eq!(outcome.decision, RemovalDecision::ErrorNotHandled);
            let diag = single_error(&outcome);
            assert!(diag.summary.contains("read cluster"));
            assert!(diag.summary.contains("cluster cl-1"));
            assert_eq!(diag.detail.as_deref(), Some("etcd lease expired"));
        }
    }

    #[test]
    fn test_idempotent() {
        let down = Status::unavailable("produced zero addresses");
        let first = eval(TriState::Unset, Some(&down));
        let second = eval(TriState::Unset, Some(&down));
        assert_eq!(first, second);
    }

    #[test]
    fn test_scenario_topic_unreachable() {
        let ctx = RemovalContext {
            resource_kind: "topic",
            resource_id: "my-topic",
            allow_deletion: TriState::Unset,
            operation: "create topic client",
        };
        let down = Status::internal("transport error: name resolver error");
        let outcome = evaluate_removal(&ctx, Some(&down), &StatusClassifier);

        assert_eq!(outcome.decision, RemovalDecision::RemoveFromState);
        let diag = single_warning(&outcome);
        assert!(diag.summary.contains("cluster unreachable"));
        assert!(diag.summary.contains("topic my-topic"));
    }

    #[test]
    fn test_scenario_pipeline_not_found_refused() {
        let ctx = RemovalContext {
            resource_kind: "pipeline",
            resource_id: "pipe-123",
            allow_deletion: TriState::False,
            operation: "find pipeline",
        };
        let gone = Status::not_found("pipeline pipe-123 not found");
        let outcome = evaluate_removal(&ctx, Some(&gone), &StatusClassifier);

        assert_eq!(outcome.decision, RemovalDecision::KeepInState);
        let diag = single_error(&outcome);
        assert!(diag.summary.contains("allow_deletion is false"));
        assert!(diag.summary.contains("pipeline pipe-123"));
    }
}
