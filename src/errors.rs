/*!
 * Error types for the humanizer.
 *
 * Each concern gets its own thiserror enum; application seams use
 * `anyhow::Result` and convert through [`AppError`].
 */

use thiserror::Error;

/// Errors raised by detector backends
#[derive(Error, Debug)]
pub enum DetectorError {
    /// The request could not be sent or completed
    #[error("Detector request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with something we cannot read
    #[error("Failed to parse detector response: {0}")]
    ParseError(String),

    /// The backend answered with an error status
    #[error("Detector responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the backend
        message: String,
    },

    /// The backend cannot be used at all
    #[error("Detector unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish in time
    #[error("Detector timed out after {0} ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for DetectorError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::RequestFailed(format!("timeout: {}", error))
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by the review store
#[derive(Error, Debug)]
pub enum ReviewError {
    /// A state file exists but is not valid JSON for its type
    #[error("Malformed JSON in {path}: {message}")]
    MalformedJson {
        /// File that failed to parse
        path: String,
        /// Parser message
        message: String,
    },

    /// An evaluation payload could not be parsed
    #[error("Invalid evaluation: {0}")]
    InvalidEvaluation(String),

    /// No recommendation carries the given id
    #[error("Unknown recommendation: {0}")]
    UnknownRecommendation(String),

    /// Reading or writing a state file failed
    #[error("Review storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration or arguments
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a detector backend
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    /// Error from the review store
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
