//! Tracing subscriber setup for the binaries. Logs go to stderr so stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

/// Filter directives are read from this variable, e.g. `BLU_LOG=blu=debug`.
pub const LOG_ENV: &str = "BLU_LOG";
const DEFAULT_FILTER: &str = "warn";

pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
