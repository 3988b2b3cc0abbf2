use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber for the migration binary.
///
/// `RUST_LOG` wins over `LOG_LEVEL`; both fall back to `default_level`.
/// Calling it twice keeps the first subscriber.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
