use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Failures raised while syncing fixtures into the booking calendar.
///
/// A failed block deletion is deliberately absent: the store reports it as a
/// `false` return and the reconciler branches on it.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fixture source unreachable or answered with a non-2xx status.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Either service returned a body without the fields we rely on.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Block creation rejected, unreachable, or answered without an id.
    #[error("block store error: {0}")]
    Store(String),

    /// The persisted fixture -> block mapping could not be read or written.
    #[error("mapping file error: {0}")]
    Mapping(String),

    /// A required setting is missing from the environment.
    #[error("configuration error: {0}")]
    Config(String),

    /// The old block was deleted but its replacement could not be created.
    /// The fixture is now unblocked on the calendar.
    #[error("fixture {fixture_id} left unblocked: deleted block {deleted_block_id}, replacement failed: {source}")]
    ReplaceIncomplete {
        fixture_id: String,
        deleted_block_id: String,
        #[source]
        source: Box<SyncError>,
    },
}
