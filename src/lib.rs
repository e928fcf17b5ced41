pub mod acuity;
pub mod config;
pub mod error;
pub mod football_data;
pub mod handler;
pub mod mapping;
pub mod model;
pub mod reconcile;
pub mod window;

pub use error::{Result, SyncError};

/// JSON log subscriber shared by both binaries. Level comes from `RUST_LOG`,
/// defaulting to `info`. Pass `timestamps = false` where the host stamps each
/// line itself (Lambda / CloudWatch).
pub fn log_subscriber<W>(timestamps: bool, writer: W) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);
    if timestamps {
        Box::new(builder.finish())
    } else {
        Box::new(builder.without_time().finish())
    }
}

/// Install [`log_subscriber`] on stdout as the global default.
pub fn init_tracing(timestamps: bool) {
    let _ = tracing::subscriber::set_global_default(log_subscriber(timestamps, std::io::stdout));
}
