//! Error types for loading the ratings feed.
//!
//! Only the fetch can fail outright. Malformed rows, bad numbers and unknown
//! show names are absorbed where they occur and never surface here.

use thiserror::Error;

/// Failure to obtain the raw feed text.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Server answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Connection, TLS or body read failure.
    #[error("network error: {0}")]
    Network(String),

    /// Local feed file could not be read.
    #[error("could not read feed file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if !status.is_success() => FeedError::Status(status.as_u16()),
            _ => FeedError::Network(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_code() {
        assert_eq!(FeedError::Status(404).to_string(), "HTTP error! status: 404");
    }

    #[test]
    fn test_io_conversion() {
        let err: FeedError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, FeedError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
