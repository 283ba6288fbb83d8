//! Logging setup for coursedex.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging for coursedex.
///
/// Uses `RUST_LOG` environment variable for filtering.
/// Default level: info
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coursedex=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging with a custom log level.
///
/// Targets are matched by prefix, so this covers every `coursedex_*` crate.
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::new(format!("coursedex={level}"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
