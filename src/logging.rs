use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const DEFAULT_LEVEL: &str = "warn";
pub const DEBUG_LEVEL: &str = "debug";

/// Installs the global subscriber. `RUST_LOG` wins over `debug`. Logs go to
/// stderr so that stdout carries only the report.
pub fn init_logging(debug: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let level = if debug { DEBUG_LEVEL } else { DEFAULT_LEVEL };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init()
}
