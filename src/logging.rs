//! Opt-in log output for applications embedding the engine.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed, either by the host application or with [`init`].

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive, e.g. `xmr_chart=debug`.
pub const LOG_ENV: &str = "XMR_LOG";

/// Install a formatting subscriber filtered by [`LOG_ENV`] (default `info`).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .is_ok()
}
