use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::record::Outcome;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Document name is not a numeric id: {}", .0.display())]
    InvalidDocumentName(PathBuf),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a valid integer: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
    #[error("Couldn't send an outcome through a channel.")]
    RuntimeSendError,
    #[error("Run interrupted, no output written.")]
    Interrupted,

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Arrow Error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
    #[error("Parquet Error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl From<mpsc::error::SendError<Outcome>> for Error {
    fn from(_value: mpsc::error::SendError<Outcome>) -> Self {
        Error::RuntimeSendError
    }
}

/// A mandatory field could not be located. Aborts extraction of one document only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Could not find meta tag '{0}'")]
    MissingMeta(&'static str),
    #[error("Could not find the main content box")]
    MissingContentBox,
    #[error("Malformed article heading: '{0}'")]
    MalformedHeading(String),
    #[error("Malformed price in heading: '{0}'")]
    MalformedPrice(String),
    #[error("No review date found")]
    MissingReviewDate,
    #[error("Invalid review date: '{0}'")]
    InvalidReviewDate(String),
    #[error("No reviewer found")]
    MissingReviewer,
    #[error("Could not find reviewer id")]
    MissingReviewerId,
    #[error("Could not extract text")]
    EmptyText,
}

impl Error {
    /// Hard extraction failures are expected; anything else is logged with full detail.
    pub fn is_classified(&self) -> bool {
        matches!(self, Error::Extract(_))
    }
}
