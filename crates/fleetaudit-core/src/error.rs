//! Error types for the fleetaudit engine

use thiserror::Error;

/// Result type alias using the fleetaudit Error
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error taxonomy.
///
/// `Configuration` is fatal to the whole run (exit 2). Everything else is a
/// per-control invocation failure that the orchestrator records and moves on
/// from; compliance failures are not errors at all, they are `Finding`s.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote execution failed: {0}")]
    RemoteExec(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error should abort the whole run rather than a single
    /// control.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}
