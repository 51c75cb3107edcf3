use tracing_subscriber::{fmt, EnvFilter};

/// Installs a compact stdout subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
