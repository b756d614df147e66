//! Errors raised by [`KieClient`](super::KieClient).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KieError {
    /// Non-success HTTP status or envelope code.
    #[error("API rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("submission accepted but no taskId was returned")]
    MissingTaskId,

    #[error("failed to parse API response: {0}")]
    Parse(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
