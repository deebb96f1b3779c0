use thiserror::Error;

/// Main error type for kbharvest
#[derive(Error, Debug)]
pub enum HarvestError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The knowledge-base dump could not be opened or read
    #[error("Store error: {0}")]
    Store(String),

    /// A partition shard was missing or unparsable
    #[error("Partition error: {0}")]
    Partition(String),

    /// A frontier cache file was missing or unparsable
    #[error("Frontier error: {0}")]
    Frontier(String),

    /// A parallel partition scan failed to join
    #[error("Task error: {0}")]
    Task(String),
}

/// Convenient Result type using HarvestError
pub type Result<T> = std::result::Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarvestError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let harvest_err: HarvestError = io_err.into();
        assert!(matches!(harvest_err, HarvestError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let harvest_err: HarvestError = json_err.into();
        assert!(matches!(harvest_err, HarvestError::Json(_)));
    }
}
