//! Process-wide tracing setup, shared by every binary and the test harness.

use tracing_subscriber::EnvFilter;

/// Initialize `tracing_subscriber` once per process.
///
/// Human-readable pretty output when `ENV=development`, default
/// machine-parseable output otherwise.
pub fn init(is_development: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    if is_development {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}
