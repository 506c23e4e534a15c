//! `tracing` subscriber setup.
//!
//! Logs go to stderr; stdout is left to whatever transport embeds the
//! library.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"info"` or `"mythic=debug"`).
///
/// Returns `false` if a subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
}
