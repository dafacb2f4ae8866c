//! Error types for the linearization pipeline.
//!
//! Everything here is fatal. There is no partial-success mode and no
//! retry: the pipeline's whole guarantee is an exact, gap-free,
//! order-correct chain, and that cannot be partially satisfied.

use std::path::PathBuf;

use thiserror::Error;

use blockline_core::{BlockHash, CoreError};
use blockline_segment::SegmentError;

use crate::config::ConfigError;

/// Errors that can occur during a linearization run.
#[derive(Debug, Error)]
pub enum LinearizeError {
    /// Configuration error, reported before any I/O happens.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A hash list line that does not parse as a block hash.
    #[error("hash list line {line}: invalid hash {value:?}")]
    InvalidHashListEntry { line: usize, value: String },

    /// The genesis hash is not in the hash list; nothing is written.
    #[error("genesis hash {0} not found in the hash list")]
    MissingGenesis(BlockHash),

    /// No blocks were read and the next input segment does not exist.
    #[error("no input data: {path} is missing and no blocks were read")]
    NoInputData { path: PathBuf },

    /// Framing error: bad magic or a frame cut short.
    #[error("segment error: {0}")]
    Segment(#[from] SegmentError),

    /// A record's payload could not be decoded.
    #[error("record error: {0}")]
    Record(#[from] CoreError),

    /// I/O error outside frame decoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A hash from the canonical order was never seen during indexing.
    #[error("block {0} not found in any input segment")]
    UnresolvedBlock(BlockHash),

    /// A re-read record hashed to something other than its expected
    /// identifier; the input changed or is corrupt.
    #[error("block {expected} re-read from {path}:{offset} hashed to {actual}")]
    BlockMismatch {
        expected: BlockHash,
        actual: BlockHash,
        path: PathBuf,
        offset: u64,
    },

    /// An indexed record could no longer be read back in full.
    #[error("input segment {path} truncated at offset {offset}")]
    TruncatedBlock { path: PathBuf, offset: u64 },
}

/// Result type for linearization operations.
pub type Result<T> = std::result::Result<T, LinearizeError>;
