//! Error types for MPP decoding.
//!
//! Only structural failures surface as errors: a block whose header is not
//! what the stream name promises, or a stream that is missing altogether.
//! Inconsistent offsets and sizes inside an otherwise valid block are
//! recovered locally and reported through `tracing` instead.

use thiserror::Error;

/// Errors that can occur when decoding MPP streams.
#[derive(Debug, Error)]
pub enum MppError {
    /// Named stream not present in the container.
    #[error("stream not found: {name}")]
    StreamNotFound { name: String },

    /// Block header does not carry the expected magic number.
    #[error("bad magic number in {block}: {found:#010x}")]
    BadMagic { block: &'static str, found: u32 },

    /// Block is shorter than its fixed header.
    #[error("{block} truncated: need {needed} bytes, found {actual}")]
    Truncated {
        block: &'static str,
        needed: usize,
        actual: usize,
    },

    /// Data is not in a format this decoder understands.
    #[error("invalid MPP data: {message}")]
    InvalidFormat { message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MPP decoding.
pub type Result<T> = std::result::Result<T, MppError>;

impl MppError {
    /// Create a StreamNotFound error.
    pub fn stream_not_found(name: impl Into<String>) -> Self {
        Self::StreamNotFound { name: name.into() }
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a Truncated error.
    pub fn truncated(block: &'static str, needed: usize, actual: usize) -> Self {
        Self::Truncated {
            block,
            needed,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MppError::BadMagic {
            block: "FixedMeta",
            found: 0x1234,
        };
        assert_eq!(format!("{err}"), "bad magic number in FixedMeta: 0x00001234");

        let err = MppError::stream_not_found("TBkndCal/FixedData");
        assert_eq!(format!("{err}"), "stream not found: TBkndCal/FixedData");

        let err = MppError::truncated("VarMeta", 24, 10);
        assert_eq!(format!("{err}"), "VarMeta truncated: need 24 bytes, found 10");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: MppError = io_err.into();
        assert!(matches!(err, MppError::Io(_)));
    }
}
