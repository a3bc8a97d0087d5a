use thiserror::Error;

/// Failure of a sync call.
///
/// Per-change problems never surface here — a malformed or unauthorized
/// change is dropped and the rest of the batch proceeds. This type covers
/// the two fatal cases: a bad envelope (400) and a store failure (500).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    InvalidEnvelope(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
