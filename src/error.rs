use crate::{player_response::PlayerResponseError, util::DownloadError};

/// Crate-level error taxonomy. Only the HTTP layer turns these into status
/// codes; everything below it propagates with `?`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("{0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DownloadError> for Error {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::IoError(e) => Error::Io(e),
            DownloadError::ReqwestError(e) => Error::Upstream(e.to_string()),
        }
    }
}

impl From<PlayerResponseError> for Error {
    fn from(e: PlayerResponseError) -> Self {
        match e {
            PlayerResponseError::FetchError(DownloadError::IoError(e)) => Error::Io(e),
            other => Error::Upstream(other.to_string()),
        }
    }
}
