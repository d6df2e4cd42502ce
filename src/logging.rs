use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

const DEFAULT_FILTER: &str = "info";

fn subscriber() -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
}

/// Installs the global stderr subscriber, `RUST_LOG` overrides the level.
pub fn init_logging() {
    subscriber().init();
}

/// Same as `init_logging`, but tolerates a subscriber being installed already.
pub fn try_init_logging() {
    subscriber().try_init().ok();
}
