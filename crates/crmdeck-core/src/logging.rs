#![forbid(unsafe_code)]

//! Logging setup.
//!
//! Engines emit `tracing` events behind the `tracing` cargo feature. This
//! module re-exports the level macros and, with `tracing-json`, installs a
//! JSON subscriber filtered by `RUST_LOG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter when `RUST_LOG` is unset.
#[cfg(feature = "tracing-json")]
pub const DEFAULT_LOG_FILTER: &str = "crmdeck=info,crmdeck_layout=info,crmdeck_core=info";

/// Install a global JSON subscriber honoring `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
