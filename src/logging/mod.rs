use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::LogLevel;

/// Diagnostics go to stderr; stdout is reserved for the report.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rest_api_tests={}", level.as_str())));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
