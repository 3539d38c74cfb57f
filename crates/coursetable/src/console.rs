//! Console output for solver events.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve, sub-problem and phase start/end)
//! - **DEBUG**: New best schedules
//! - **TRACE**: Individual moves

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a `tracing` subscriber printing solver events to stderr.
///
/// Safe to call multiple times - only the first call has effect. The
/// filter defaults to `coursetable_solver=info` and can be overridden with
/// `RUST_LOG`.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("coursetable_solver=info,coursetable=info"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        assert!(INIT.get().is_some());
    }
}
