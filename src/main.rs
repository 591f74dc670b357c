mod auth;
mod cli;
mod error;
mod http;
mod logging;
mod table;
mod testing;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use crate::cli::CliConfig;
use crate::http::client::ApiClient;
use crate::testing::report::Reporter;
use crate::testing::runner::Runner;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = CliConfig::parse();
    logging::init_logging(config.log_level);

    let client = match ApiClient::new(config.timeout()) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "cannot start");
            return ExitCode::FAILURE;
        }
    };

    let cases = table::test_cases();
    info!(base_url = %config.base_url, cases = cases.len(), "running REST API tests");

    let runner = Runner::new(client, config.base_url.as_str());
    let mut reporter = Reporter::new(config.output, io::stdout().lock());
    let report = runner
        .run(&cases, |case| {
            if let Err(err) = reporter.case(case) {
                warn!(error = %err, "failed to write case report");
            }
        })
        .await;

    if let Err(err) = reporter.summary(&report) {
        warn!(error = %err, "failed to write summary");
    }

    ExitCode::from(report.exit_code())
}
