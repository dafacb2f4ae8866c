//! # Blockline
//!
//! A linearization pipeline for block-chain segment files: scan a directory
//! of raw, append-only segments full of out-of-order framed records, build
//! a random-access index keyed by each record's content hash, then re-emit
//! the records in a caller-supplied canonical order into fresh output
//! segments, rotated by size or by calendar month.
//!
//! ## Pipeline
//!
//! The run is strictly two-phase and single-threaded:
//!
//! 1. **Index**: every input segment is scanned once front to back. Records
//!    whose hash appears in the hash list get a `(file, offset)` entry.
//! 2. **Assemble**: the hash list is walked in order; each record is
//!    re-read at its indexed location, re-verified against its expected
//!    hash, and appended to the output.
//!
//! Any integrity or protocol violation aborts the whole run: a linear
//! chain with a gap or a wrong record is worse than no output.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use blockline::{Config, Linearizer};
//!
//! fn example() -> blockline::Result<()> {
//!     let config = Config::load("linearize.cfg".as_ref())?;
//!     let report = Linearizer::new(config).run()?;
//!     println!("wrote {} blocks", report.blocks_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `blockline::core` - frame and record primitives
//! - `blockline::segment` - segment-file I/O

pub mod config;
pub mod error;
pub mod hashlist;
pub mod index;
pub mod linearize;

// Re-export component crates
pub use blockline_core as core;
pub use blockline_segment as segment;

// Re-export main types for convenience
pub use config::{Config, ConfigError, DEFAULT_GENESIS_HASH, DEFAULT_MAX_SEGMENT_BYTES};
pub use error::{LinearizeError, Result};
pub use hashlist::HashList;
pub use index::{build_index, BlockLocation, LookupIndex};
pub use linearize::{Linearizer, RunReport};

// Re-export commonly used component types
pub use blockline_core::{Blake3Hasher, BlockHash, BlockHasher, BlockRecord, Frame, NetMagic};
pub use blockline_segment::{OutputTarget, RotationPolicy};
