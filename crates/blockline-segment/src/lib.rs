//! # Blockline Segment
//!
//! Segment-file I/O for the Blockline pipeline.
//!
//! ## Overview
//!
//! A segment file is an append-only sequence of frames (see
//! `blockline-core`). This crate owns everything that touches those files:
//!
//! - [`SegmentReader`] / [`read_frame`] - sequential, forward-only frame
//!   decoding with end-of-segment detection
//! - [`OutputSegmenter`] - the single output handle, with size-cap and
//!   month-boundary rotation and optional mtime stamping
//! - [`HandleCache`] - lazily-opened read handles for reassembly, bounded
//!   by the number of distinct input segments and released together on drop
//!
//! All I/O is synchronous and blocking; the pipeline is single-threaded by
//! design, so nothing here is shared across threads.

pub mod error;
pub mod handles;
pub mod layout;
pub mod reader;
pub mod writer;

pub use error::{Result, SegmentError};
pub use handles::HandleCache;
pub use layout::{input_segment_name, output_segment_name};
pub use reader::{read_frame, SegmentReader};
pub use writer::{OutputSegmenter, OutputSummary, OutputTarget, RotationPolicy};
