use std::io;
use thiserror::Error;

use crate::core::filter::MatchError;
use crate::core::threshold::ThresholdError;

/// Error type shared by the checks and their acquisition layer
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid threshold: {0}")]
    Threshold(#[from] ThresholdError),

    #[error(transparent)]
    Filter(#[from] MatchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),
}

/// Result type alias for the check library
pub type Result<T> = std::result::Result<T, CheckError>;

impl CheckError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CheckError::Config(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        CheckError::MetricCollection(msg.into())
    }
}
