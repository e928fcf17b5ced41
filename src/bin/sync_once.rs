//! Single reconciliation pass for cron. No flags; configuration comes from the environment.

use std::process::ExitCode;

use fixture_block_sync::config::Config;
use fixture_block_sync::handler::{sync, Mode};
use tracing::{error, info};

fn main() -> ExitCode {
    fixture_block_sync::init_tracing(true);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match sync(&config, Mode::Production) {
        Ok(summary) => {
            for failure in summary.failures() {
                error!(fixture_id = %failure.fixture_id, opponent = %failure.opponent, outcome = ?failure.outcome, "Fixture not synced");
            }
            info!(message = %summary.message(), "Fixture sync complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Fixture sync aborted");
            ExitCode::FAILURE
        }
    }
}
