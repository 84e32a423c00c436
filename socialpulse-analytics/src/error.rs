//! Error taxonomy for the analytics collaborator.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scrape job failed: {0}")]
    JobFailed(String),

    #[error("scrape job still pending after {0} polls")]
    AttemptsExhausted(u32),

    #[error("analytics fetch exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),

    #[error("unexpected response shape: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
