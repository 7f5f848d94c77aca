//! # Structured Logging Module
//!
//! Environment-aware structured logging for debugging concurrent partition
//! runs. Output format and verbosity are controlled through environment
//! variables so test hosts can opt in without code changes.

use std::env;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process.
///
/// Verbosity comes from `RUST_LOG` (default `info`). Setting
/// `PARTITION_LOG_FORMAT=json` switches to JSON output for machine-readable
/// capture. Safe to call from multiple tests or embedding hosts; only the
/// first call installs a subscriber.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = env::var("PARTITION_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry
                .with(fmt::layer().with_target(true).with_ansi(false).json())
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init()
        };

        // A host may have installed its own subscriber already; that is fine.
        if result.is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
