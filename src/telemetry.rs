use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies. Does nothing if a
/// subscriber is already installed.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
