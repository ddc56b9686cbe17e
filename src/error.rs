//! Error types for geoshare

use std::fmt;
use std::io;

/// Result type for geoshare operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in geoshare operations
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Numerical failure anywhere in the projection pipeline
    Projection(String),

    /// Caller supplied a value that cannot be used
    InvalidInput(String),

    /// CSV decoding or encoding error
    Csv(csv::Error),

    /// HTTP transport error
    Http(reqwest::Error),

    /// The context analysis service failed
    Analysis(String),

    /// Invalid runtime configuration
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Projection(msg) => write!(f, "Projection error: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Analysis(msg) => write!(f, "Analysis error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Http(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Projection("latitude is NaN".to_string());
        assert_eq!(err.to_string(), "Projection error: latitude is NaN");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error() {
        let err = Error::Config("GEOSHARE_BIND".to_string());
        assert!(err.to_string().contains("GEOSHARE_BIND"));
        assert!(std::error::Error::source(&err).is_none());
    }
}
