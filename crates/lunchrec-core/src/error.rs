use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LunchRecError {
    #[error("directory error: {0}")]
    Directory(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("generation deadline exceeded after {elapsed:?}")]
    DeadlineExceeded { elapsed: Duration },
}

impl LunchRecError {
    /// Wrap an arbitrary storage/backend failure as a directory error.
    pub fn directory<E: std::fmt::Display>(err: E) -> Self {
        LunchRecError::Directory(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LunchRecError>;
