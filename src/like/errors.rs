//! Errors that can happen when talking to the like service.

use reqwest::StatusCode;
use thiserror::Error;

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LikeError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("like service responded with `{0}`")]
    Status(StatusCode),
    #[error("failed to decode like service response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientBuilderError {
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    #[error("like service url `{0}` cannot carry a query string")]
    CannotBeABase(String),
    #[error("failed to build http client: {0}")]
    BuildFailed(#[source] reqwest::Error),
}
