//! Tracing setup
//!
//! Log output goes to stderr so table and export output on stdout stays
//! clean.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "BUDGET_GRID_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once.
///
/// The filter comes from `BUDGET_GRID_LOG` when set, else `fallback` (the
/// `log_filter` setting). An unparseable directive falls back to `warn`.
pub fn init_tracing(fallback: &str) {
    TRACING_INIT.call_once(|| {
        let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), fallback);
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

fn build_filter(from_env: Option<&str>, fallback: &str) -> EnvFilter {
    from_env
        .filter(|directive| !directive.trim().is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(fallback).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
