//! Diagnostic logging setup.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` wins, then `-v`, then the configured level.
#[must_use]
pub fn filter(configured: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { configured };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    })
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(configured: &str, verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(filter(configured, verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
