use fixture_block_sync::config::Config;
use fixture_block_sync::handler::handler;
use lambda_runtime::{service_fn, Error};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    fixture_block_sync::init_tracing(false);

    // Missing credentials fail the cold start, not individual invocations.
    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    info!(config = ?config, "Loaded configuration");

    lambda_runtime::run(service_fn(move |event| handler(event, config.clone()))).await
}
