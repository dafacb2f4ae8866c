//! Error types for Blockline core primitives.

use thiserror::Error;

/// Errors that can occur while decoding frames and block records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid block hash: {0:?}")]
    InvalidHash(String),

    #[error("invalid network magic: {0:?}")]
    InvalidMagic(String),

    #[error("block record too short: {len} bytes, need at least 4 for the version field")]
    RecordTooShort { len: usize },

    #[error("block header too short: {len} bytes, timestamp field ends at {needed}")]
    HeaderTooShort { needed: usize, len: usize },
}
