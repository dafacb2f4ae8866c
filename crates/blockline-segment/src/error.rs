//! Error types for segment-file I/O.

use blockline_core::NetMagic;
use thiserror::Error;

/// Errors that can occur while reading or writing segment files.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame carried the wrong network magic.
    #[error("invalid magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: NetMagic, actual: NetMagic },

    /// A frame's payload was cut short.
    #[error("truncated frame: payload of {expected} bytes cut short at {actual}")]
    TruncatedFrame { expected: usize, actual: usize },
}

/// Result type for segment operations.
pub type Result<T> = std::result::Result<T, SegmentError>;
