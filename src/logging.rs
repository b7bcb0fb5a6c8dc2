//! Logging setup for lifecycle consumers.
//!
//! Providers embedding this crate usually run as plugin subprocesses whose
//! stdout belongs to the host's handshake protocol, so all logs go to
//! **stderr**. Filtering follows the `RUST_LOG` environment variable
//! (e.g. `RUST_LOG=controlplane_lifecycle=debug`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize the default logging subscriber.
///
/// Writes to stderr, respects `RUST_LOG`, defaults to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set; use
/// [`try_init_logging`] where that can happen.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Like [`init_logging`] with a custom default level used when `RUST_LOG`
/// is not set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning `false` if a global subscriber was
/// already set instead of panicking.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}
