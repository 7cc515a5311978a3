use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the stderr log subscriber. `RUST_LOG` overrides `level`.
pub fn init_tracing(level: Level) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
