//! Tracing initialization.
//!
//! Logs go to stderr: with the stdio transport, stdout carries MCP frames
//! and must not see a single stray byte.
//!
//! `RUST_LOG` controls filtering, e.g. `RUST_LOG=genimage_mcp=debug`.
//!
//! ```no_run
//! genimage_mcp_common::tracing::init_tracing();
//! tracing::info!("Server starting");
//! ```

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Level used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber(
    default_level: &str,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer)
}

/// Initialize the global subscriber.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    subscriber(DEFAULT_LEVEL).init();
}

/// Initialize tracing with a custom default level.
pub fn init_tracing_with_default(default_level: &str) {
    subscriber(default_level).init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Safe to call from several tests in one process.
pub fn try_init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    subscriber(DEFAULT_LEVEL).try_init()
}
