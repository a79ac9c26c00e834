//! Error types for CoucheServe

use std::time::Duration;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in CoucheServe
#[derive(Error, Debug)]
pub enum Error {
    /// Backing-store read did not finish within the configured deadline.
    /// The read itself keeps running and may still populate the cache.
    #[error("read of '{filename}' timed out after {timeout:?}")]
    ReadTimeout { filename: String, timeout: Duration },

    /// Backing store could not produce the file (missing, unreadable, ...)
    #[error("failed to read '{filename}': {reason}")]
    ReadFailed { filename: String, reason: String },

    /// Message addressed to a cache actor generation that has terminated
    #[error("cache is closed")]
    CacheClosed,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the timeout failure kind, which the HTTP layer maps to a
    /// distinct status code from ordinary read failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::ReadTimeout { .. })
    }

    /// True when the backing store reported the file could not be read.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Error::ReadFailed { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        let err = Error::ReadTimeout {
            filename: "./index.html".to_string(),
            timeout: Duration::from_secs(2),
        };
        assert!(err.is_timeout());
        assert!(!err.is_read_failure());
    }

    #[test]
    fn test_read_failure_classification() {
        let err = Error::ReadFailed {
            filename: "./missing.txt".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert!(err.is_read_failure());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_error_display() {
        let err = Error::ReadFailed {
            filename: "./a.txt".to_string(),
            reason: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "failed to read './a.txt': denied");
    }
}
