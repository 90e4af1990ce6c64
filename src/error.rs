//! Error types for geopin

use thiserror::Error;

/// Main error type for geopin operations
#[derive(Error, Debug)]
pub enum Error {
    /// User input rejected before any state was touched
    #[error("Validation error: {0}")]
    Validation(String),

    /// A lookup completed but produced nothing usable
    #[error("Not found: {0}")]
    NotFound(String),

    /// Gateway unreachable or returned a non-success status
    #[error("Network error: {0}")]
    Network(String),

    /// Durable record could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    /// Malformed geocoder payload (unparseable coordinates and the like)
    #[error("Geo error: {0}")]
    Geo(String),
}

impl Error {
    /// Short failure class, used in user-facing notifications
    pub fn class(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid input",
            Self::NotFound(_) => "not found",
            Self::Network(_) | Self::Http(_) => "network failure",
            Self::Storage(_) | Self::Io(_) => "storage failure",
            Self::Geo(_) | Self::Json(_) => "unreadable response",
            Self::Config(_) => "configuration error",
            Self::Server(_) => "server error",
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http(_))
    }
}

/// Result type alias for geopin operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(Error::Validation("x".into()).class(), "invalid input");
        assert_eq!(Error::NotFound("x".into()).class(), "not found");
        assert_eq!(Error::Network("x".into()).class(), "network failure");
        assert_eq!(Error::Geo("x".into()).class(), "unreadable response");
    }

    #[test]
    fn test_only_network_is_transient() {
        assert!(Error::Network("down".into()).is_transient());
        assert!(!Error::NotFound("cep".into()).is_transient());
        assert!(!Error::Validation("cep".into()).is_transient());
    }
}
