//! Operator-facing diagnostics.
//!
//! A diagnostic is a warning or error entry surfaced to the operator by the
//! hosting plugin framework. Warnings are displayed but do not fail the
//! overall operation; errors abort it.

use serde::{Deserialize, Serialize};

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// An error that fails the operation it was produced by.
    Error,
    /// A warning displayed to the operator without failing the operation.
    Warning,
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: DiagnosticSeverity,
    /// A short summary of the issue.
    pub summary: String,
    /// A detailed description of the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
        }
    }

    /// Add detail to this diagnostic.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Whether any diagnostic in the slice is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builders() {
        let err = Diagnostic::error("cluster cl-1 gone").with_detail("was deleted out-of-band");
        assert_eq!(err.severity, DiagnosticSeverity::Error);
        assert_eq!(err.summary, "cluster cl-1 gone");
        assert_eq!(err.detail, Some("was deleted out-of-band".to_string()));
        assert!(err.is_error());

        let warn = Diagnostic::warning("resource may still exist remotely");
        assert!(!warn.is_error());
        assert!(warn.detail.is_none());
    }

    #[test]
    fn test_has_errors() {
        assert!(!has_errors(&[]));
        assert!(!has_errors(&[Diagnostic::warning("drift")]));
        assert!(has_errors(&[
            Diagnostic::warning("drift"),
            Diagnostic::error("gone"),
        ]));
    }
}
