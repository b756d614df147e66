use thiserror::Error;

/// Errors raised by [`AirtableClient`](super::AirtableClient).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Airtable returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("no catalog record with code {0}")]
    NotFound(String),

    #[error("catalog record {0} has no attachment")]
    NoAttachment(String),

    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display() {
        let err = CatalogError::Rejected {
            status: 422,
            message: "INVALID_VALUE_FOR_COLUMN".into(),
        };
        assert_eq!(
            err.to_string(),
            "Airtable returned status 422: INVALID_VALUE_FOR_COLUMN"
        );
    }
}
