use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::acuity::Acuity;
use crate::config::Config;
use crate::error::Result;
use crate::football_data::FootballData;
use crate::mapping::Mapping;
use crate::reconcile::{BlockSettings, Reconciler, RunSummary};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Dry run: fetch and plan, change nothing.
    Test,
    #[default]
    Production,
}

/// Invocation payload. A bare scheduled event (`{}`) runs in production mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub message: String,
    pub summary: RunSummary,
}

/// Run one pass with the real collaborators.
pub fn sync(config: &Config, mode: Mode) -> Result<RunSummary> {
    let mapping = Mapping::load(config.mapping_path.clone())?;
    let mut reconciler = Reconciler::new(
        FootballData::from_config(config),
        Acuity::from_config(config),
        mapping,
        BlockSettings::from_config(config),
    );
    let now = chrono::Utc::now();
    match mode {
        Mode::Test => reconciler.preview(now),
        Mode::Production => reconciler.run(now),
    }
}

#[instrument(skip(event, config))]
pub async fn handler(event: LambdaEvent<Request>, config: Config) -> std::result::Result<Response, Error> {
    let mode = event.payload.mode;
    info!(mode = ?mode, "Starting fixture sync");

    // ureq is blocking; keep it off the runtime's worker threads.
    let outcome = tokio::task::spawn_blocking(move || sync(&config, mode)).await?;

    match outcome {
        Ok(summary) => {
            let message = summary.message();
            for failure in summary.failures() {
                error!(fixture_id = %failure.fixture_id, opponent = %failure.opponent, outcome = ?failure.outcome, "Fixture not synced");
            }
            info!(message = %message, "Fixture sync complete");
            Ok(Response { message, summary })
        }
        Err(e) => {
            error!(error = %e, "Fixture sync aborted");
            Err(e.into())
        }
    }
}
