//! Command-line configuration.
//!
//! Every flag has a default, so a bare invocation runs the whole table
//! against a locally running service.
//!
//! | Flag | Variable | Default |
//! |------|----------|---------|
//! | `--base-url` | `REST_API_TESTS_BASE_URL` | `http://localhost:8080/api/v1/` |
//! | `--timeout` | `REST_API_TESTS_TIMEOUT` | none (`0` also means none) |
//! | `--log-level` | `REST_API_TESTS_LOG_LEVEL` | `warn` |
//! | `--output` | `REST_API_TESTS_OUTPUT` | `text` |

use std::time::Duration;

use clap::{Parser, ValueEnum};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1/";

#[derive(Debug, Clone, Parser)]
#[command(name = "rest-api-tests")]
#[command(about = "Run the REST API test table against a live service")]
pub struct CliConfig {
    /// Prefix prepended verbatim to every endpoint.
    #[arg(long, env = "REST_API_TESTS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds. `0` disables the timeout.
    #[arg(long, env = "REST_API_TESTS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Log level for the harness. `RUST_LOG` takes precedence.
    #[arg(long, env = "REST_API_TESTS_LOG_LEVEL", value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[arg(long, env = "REST_API_TESTS_OUTPUT", value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl CliConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.filter(|secs| *secs != 0).map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// How the run is reported on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines as cases complete, then a summary.
    #[default]
    Text,
    /// One JSON document with the full report at the end.
    Json,
}
