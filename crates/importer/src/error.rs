use thiserror::Error;

use crate::dom::LayoutError;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("HTTP error {status}: {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error(transparent)]
    LayoutError(#[from] LayoutError),

    #[error("No match ffvbId found")]
    MissingMatchId,

    #[error("Match row has no {0} cell")]
    MissingCell(&'static str),

    #[error("Missing query parameter '{0}' in competition URL")]
    MissingQueryParam(&'static str),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
