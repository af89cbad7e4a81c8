//! Error types for athena.

use thiserror::Error;

/// Errors raised by the athena library and CLI.
#[derive(Debug, Error)]
pub enum AthenaError {
    /// Configuration could not be resolved, read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The local `SQLite` store failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Caller supplied an argument that cannot be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for AthenaError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Backend {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Self::InvalidInput(format!("Unexpected backend response: {err}"));
        }
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AthenaError::Backend {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 503: unavailable");

        let err = AthenaError::NotFound("Analysis 'abc'".to_string());
        assert_eq!(err.to_string(), "Not found: Analysis 'abc'");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AthenaError = parse_err.into();
        assert!(matches!(err, AthenaError::Parse(_)));
    }
}
