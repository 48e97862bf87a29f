//! Diagnostic logging via `tracing`.
//!
//! Operator-facing progress goes through `output`; this is the stderr
//! channel for what the bootstrap is doing internally.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or
/// everything from this crate at `debug` with `verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "argoboot=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
