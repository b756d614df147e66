use thiserror::Error;

use crate::catalog::CatalogError;
use crate::job::Stage;
use crate::kie::KieError;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream rejected request (code {code}): {message}")]
    UpstreamRejected { code: i64, message: String },

    #[error("Generation failed: {0}")]
    UpstreamFailed(String),

    #[error("Timed out waiting for job {task_id} after {attempts} status checks")]
    Timeout { task_id: String, attempts: u32 },

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Stable identifier reported in `structuredContent.error.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            MediaError::Config(_) => "config",
            MediaError::InvalidInput(_) => "invalid_input",
            MediaError::UpstreamRejected { .. } => "upstream_rejected",
            MediaError::UpstreamFailed(_) => "upstream_failed",
            MediaError::Timeout { .. } => "timeout",
            MediaError::InvalidResponse(_) => "invalid_response",
            MediaError::Transcription(_) => "transcription",
            MediaError::Catalog(_) => "catalog",
            MediaError::InvalidTransition { .. } => "internal_error",
            MediaError::Http(_) => "transport",
            MediaError::Io(_) => "io",
        }
    }
}

impl From<KieError> for MediaError {
    fn from(err: KieError) -> Self {
        match err {
            KieError::Rejected { code, message } => MediaError::UpstreamRejected { code, message },
            KieError::Network(e) => MediaError::Http(e),
            KieError::MissingTaskId => {
                MediaError::InvalidResponse(KieError::MissingTaskId.to_string())
            }
            KieError::Parse(message) => MediaError::InvalidResponse(message),
        }
    }
}
