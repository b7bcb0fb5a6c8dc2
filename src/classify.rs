//! Transport-error classification.
//!
//! The removal policy switches on a small taxonomy derived from the error a
//! control-plane RPC returned. Status codes cover most of it; unreachability
//! additionally relies on matching known message fragments, because some
//! client stacks report DNS and connection failures as bare internal errors.
//! That heuristic is brittle across transport-library upgrades, so it lives
//! here, in one place, behind the [`ErrorClassifier`] trait.

use serde::{Deserialize, Serialize};
use tonic::{Code, Status};

/// Classification of an error returned by a control-plane RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The remote resource does not exist.
    NotFound,
    /// The remote endpoint could not be reached at all.
    ClusterUnreachable,
    /// The caller is not permitted to read the remote resource.
    PermissionDenied,
    /// Anything else; never downgraded by the removal policy.
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::ClusterUnreachable => write!(f, "cluster unreachable"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Capability to classify a transport error.
///
/// Swap the implementation to adapt to a different client stack, or extend
/// the default [`StatusClassifier`] heuristics without touching call sites.
pub trait ErrorClassifier: Send + Sync {
    /// Classify the given status. Called once per policy evaluation.
    fn classify(&self, status: &Status) -> ErrorKind;
}

impl<F> ErrorClassifier for F
where
    F: Fn(&Status) -> ErrorKind + Send + Sync,
{
    fn classify(&self, status: &Status) -> ErrorKind {
        self(status)
    }
}

/// Message fragments (lowercase) that indicate the remote endpoint is
/// unreachable even when the status code does not say so.
const UNREACHABLE_PATTERNS: &[&str] = &[
    "name resolver error",
    "produced zero addresses",
    "connection refused",
    "dns error",
    "failed to lookup address",
];

/// Default classifier over [`tonic::Status`].
///
/// Code `NotFound` and `PermissionDenied` map directly; code `Unavailable`
/// or an unreachability message fragment maps to
/// [`ErrorKind::ClusterUnreachable`]; everything else is
/// [`ErrorKind::Unknown`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusClassifier;

impl ErrorClassifier for StatusClassifier {
    fn classify(&self, status: &Status) -> ErrorKind {
        match status.code() {
            Code::NotFound => ErrorKind::NotFound,
            Code::PermissionDenied => ErrorKind::PermissionDenied,
            Code::Unavailable => ErrorKind::ClusterUnreachable,
            _ => {
                let message = status.message().to_ascii_lowercase();
                if UNREACHABLE_PATTERNS.iter().any(|p| message.contains(p)) {
                    ErrorKind::ClusterUnreachable
                } else {
                    ErrorKind::Unknown
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: Status) -> ErrorKind {
        StatusClassifier.classify(&status)
    }

    #[test]
    fn test_classify_by_code() {
        assert_eq!(
            classify(Status::not_found("cluster cl-1 not found")),
            ErrorKind::NotFound
        );
        assert_eq!(
            classify(Status::permission_denied("token lacks admin scope")),
            ErrorKind::PermissionDenied
        );
        assert_eq!(
            classify(Status::unavailable("channel closed")),
            ErrorKind::ClusterUnreachable
        );
        assert_eq!(classify(Status::internal("boom")), ErrorKind::Unknown);
        assert_eq!(
            classify(Status::invalid_argument("bad id")),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_classify_by_message_pattern() {
        assert_eq!(
            classify(Status::internal(
                "transport error: name resolver error: produced zero addresses"
            )),
            ErrorKind::ClusterUnreachable
        );
        assert_eq!(
            classify(Status::unknown("tcp connect: Connection refused (os error 111)")),
            ErrorKind::ClusterUnreachable
        );
        assert_eq!(
            classify(Status::internal("dns error: failed to lookup address")),
            ErrorKind::ClusterUnreachable
        );
    }

    #[test]
    fn test_pattern_match_is_case_insensitive() {
        assert_eq!(
            classify(Status::internal("Name Resolver Error")),
            ErrorKind::ClusterUnreachable
        );
    }

    #[test]
    fn test_code_wins_over_message() {
        // A not-found that happens to mention DNS is still a not-found.
        assert_eq!(
            classify(Status::not_found("no dns error record for cl-1")),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_closure_classifier() {
        let always_not_found = |_: &Status| ErrorKind::NotFound;
        assert_eq!(
            always_not_found.classify(&Status::internal("anything")),
            ErrorKind::NotFound
        );
    }
}
