//! # Blockline Core
//!
//! Pure primitives for the Blockline linearization pipeline: block hashes,
//! segment frame encoding, and block record headers.
//!
//! This crate contains no I/O. It is pure computation over the byte formats
//! that the rest of the pipeline moves between files.
//!
//! ## Key Types
//!
//! - [`BlockHash`] - Content-derived identifier of a block record
//! - [`NetMagic`] - The 4-byte network constant that prefixes every frame
//! - [`Frame`] - One magic+length+payload unit within a segment file
//! - [`BlockRecord`] - A decoded view of one frame payload
//! - [`BlockHasher`] - The injected capability that derives a [`BlockHash`]
//!   from a record's header bytes
//!
//! ## Framing
//!
//! A segment file is a sequence of frames: 4 bytes of network magic, a
//! 4-byte little-endian payload length, then the payload. The payload's
//! first 4 bytes are a little-endian signed version that selects the header
//! length (80 bytes below version 8, 88 from version 8 on). Everything past
//! the header is opaque and copied verbatim.

pub mod error;
pub mod frame;
pub mod hash;
pub mod record;
pub mod types;

pub use error::CoreError;
pub use frame::{Frame, FrameHeader, FRAME_HEADER_LEN};
pub use hash::{Blake3Hasher, BlockHasher};
pub use record::{BlockRecord, Month, EXTENDED_HEADER_LEN, LEGACY_HEADER_LEN, TIMESTAMP_OFFSET};
pub use types::{BlockHash, NetMagic, DEFAULT_NET_MAGIC};
