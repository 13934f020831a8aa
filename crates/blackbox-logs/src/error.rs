//! Error types for the recorder.

use thiserror::Error;

/// Errors that can occur while recording or reading captured data.
#[derive(Debug, Error)]
pub enum LogError {
    /// A required field was not provided to a builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid configuration supplied at construction time.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An I/O error from the backing file system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for recorder operations.
pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = LogError::MissingField("url");
        assert_eq!(err.to_string(), "missing required field: url");

        let err = LogError::Config("max_capacity must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: max_capacity must be > 0"
        );
    }

    #[test]
    fn error_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LogError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn error_serialization_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: LogError = json_err.into();
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LogError>();
    }
}
