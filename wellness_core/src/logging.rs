//! Tracing setup for the `wellness` binary.
//!
//! Command results go to stdout, and with `--json` stdout must parse as a
//! single JSON document. All diagnostics therefore go to stderr, and only
//! warnings are shown unless `RUST_LOG` asks for more.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber at WARN
///
/// WARN covers the events an operator acts on: unrecognized activity labels
/// scored fail-soft, skipped journal lines, chat quota fallbacks.
pub fn init() {
    init_with_level("warn")
}

/// Install the stderr subscriber with `default_level` as the filter
///
/// `RUST_LOG=wellness_core=debug` overrides it, e.g. to see every computed
/// assessment and journal append.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route events through the libtest writer so they show for failing tests
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
