//! Error types for Surge.

use thiserror::Error;

/// Result type alias for Surge operations
pub type Result<T> = std::result::Result<T, SurgeError>;

/// Main error type for the Surge library.
///
/// Construction and configuration failures only. Hot-path outcomes
/// (no-data, no-space, stale publish) are status enums, never errors.
#[derive(Error, Debug)]
pub enum SurgeError {
    /// Invalid configuration parameter
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Generic error for conditions that indicate a logic bug
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Error message describing the unexpected condition
        message: String,
    },
}

impl SurgeError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SurgeError::config("test message");
        assert!(matches!(err, SurgeError::InvalidConfig { .. }));
        assert_eq!(err.to_string(), "Invalid configuration: test message");
    }

    #[test]
    fn test_unexpected_error() {
        let err = SurgeError::unexpected("logic bug");
        assert!(matches!(err, SurgeError::Unexpected { .. }));
    }
}
