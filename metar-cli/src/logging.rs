use std::io;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `METAR_LOG=metar_core=debug`.
pub const LOG_ENV: &str = "METAR_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Logs go to stderr so stdout carries report
/// bodies only.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
