//! Provider initialization and lifecycle assembly.
//!
//! Initialization is an explicit phase with typed inputs: the hosting
//! provider deserializes its configuration into a [`ConnectionConfig`],
//! validates it, constructs its API clients, and assembles one
//! [`ResourceLifecycle`] per resource kind through [`LifecycleBuilder`].
//! Handlers receive every capability at construction time; nothing is
//! populated after the fact by a runtime callback.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::{ErrorClassifier, StatusClassifier};
use crate::diagnostics::Diagnostic;
use crate::lifecycle::ResourceLifecycle;
use crate::operation::OperationAccessor;
use crate::removal::TriState;
use crate::waiter::WaitOptions;

fn default_request_timeout_secs() -> u64 {
    30
}

/// Typed input for the provider initialization phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Control-plane endpoint, e.g. `https://api.example.com:443`.
    pub endpoint: String,
    /// Bearer token for the control-plane API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds for control-plane RPCs.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ConnectionConfig {
    /// A config for the given endpoint with default timeouts and no token.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Set the bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// The per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration, returning one diagnostic per problem.
    /// An empty list means the config is usable.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if self.endpoint.is_empty() {
            diagnostics.push(
                Diagnostic::error("endpoint must not be empty")
                    .with_detail("set the control-plane endpoint, e.g. https://api.example.com:443"),
            );
        }
        if self.request_timeout_secs == 0 {
            diagnostics.push(Diagnostic::error("request_timeout_secs must be greater than zero"));
        }
        diagnostics
    }
}

/// Assembles a [`ResourceLifecycle`] from injected capabilities.
///
/// Defaults: [`StatusClassifier`], default [`WaitOptions`], and an unset
/// `allow_deletion` flag.
///
/// # Example
///
/// ```
/// use controlplane_lifecycle::config::LifecycleBuilder;
/// use controlplane_lifecycle::testing::ScriptedAccessor;
///
/// let lifecycle = LifecycleBuilder::new("cluster", ScriptedAccessor::new())
///     .with_allow_deletion(Some(false))
///     .build();
///
/// assert_eq!(lifecycle.kind(), "cluster");
/// ```
pub struct LifecycleBuilder<A> {
    kind: String,
    accessor: A,
    classifier: Arc<dyn ErrorClassifier>,
    wait: WaitOptions,
    allow_deletion: TriState,
}

impl<A: OperationAccessor> LifecycleBuilder<A> {
    /// Start a builder for the given resource kind and accessor.
    pub fn new(kind: impl Into<String>, accessor: A) -> Self {
        Self {
            kind: kind.into(),
            accessor,
            classifier: Arc::new(StatusClassifier),
            wait: WaitOptions::default(),
            allow_deletion: TriState::Unset,
        }
    }

    /// Replace the error classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the wait timing for operation completion.
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the `allow_deletion` flag. Accepts `bool`, `Option<bool>` or
    /// [`TriState`].
    pub fn with_allow_deletion(mut self, allow: impl Into<TriState>) -> Self {
        self.allow_deletion = allow.into();
        self
    }

    /// Build the lifecycle helper.
    pub fn build(self) -> ResourceLifecycle<A> {
        ResourceLifecycle::new(
            self.kind,
            self.accessor,
            self.classifier,
            self.wait,
            self.allow_deletion,
        )
    }
}
