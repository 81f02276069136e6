use fraudcheck_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("{0}")]
    Backend(String),
    #[error("Uma extração já está em andamento")]
    Busy,
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Failures that happened before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Core(CoreError::Validation(_)))
    }

    /// Failures of the transport or the server, as opposed to local checks.
    pub fn is_network(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            SyncError::Http(_) => true,
            SyncError::Server { .. } => true,
            _ => false,
        }
    }
}
