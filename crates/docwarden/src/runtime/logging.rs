//! Tracing subscriber setup for the `docwarden` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_FILTER_ENV: &str = "DOCWARDEN_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str = "docwarden=debug";

/// Install the stderr log layer.
///
/// `DOCWARDEN_LOG` wins over `verbose`. Report output goes to stdout, so logs never mix into
/// JSON or Markdown renderings. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init();
}
