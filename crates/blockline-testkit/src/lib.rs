//! # Blockline Testkit
//!
//! Testing utilities for the Blockline pipeline.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: build synthetic block records and whole input segment
//!   trees on disk, with identifiers you choose up front
//! - **Generators**: proptest strategies for property-based testing
//! - **Golden vectors**: fixed inputs with derived framing and hashing
//!   outputs, for cross-checking the encoding path
//!
//! ## The stub hasher
//!
//! Most tests want to dictate a block's identifier instead of deriving it.
//! [`StubHasher`] reads the identifier straight out of header bytes 4..36,
//! so [`fixtures::block`] can stamp any [`BlockHash`] into a record:
//!
//! ```rust
//! use blockline_core::{BlockHash, BlockHasher, BlockRecord};
//! use blockline_testkit::{fixtures, StubHasher};
//!
//! let id = BlockHash::from_bytes([0xab; 32]);
//! let frame = fixtures::block(id, 1_408_893_517);
//! let record = BlockRecord::parse(frame.payload.clone()).unwrap();
//! assert_eq!(StubHasher.block_hash(record.header()), id);
//! ```
//!
//! ## Pipeline fixtures
//!
//! [`fixtures::PipelineFixture`] lays out a full input tree in a temp
//! directory and hands back a ready [`blockline::Config`]:
//!
//! ```rust,no_run
//! use blockline::Linearizer;
//! use blockline_core::BlockHash;
//! use blockline_testkit::{fixtures::PipelineFixture, StubHasher};
//!
//! let fixture = PipelineFixture::new();
//! let a = BlockHash::from_bytes([0xaa; 32]);
//! let b = BlockHash::from_bytes([0xbb; 32]);
//! fixture.write_segment(1, &[fixture.block(a, 1_408_893_517)]);
//! fixture.write_segment(2, &[fixture.block(b, 1_408_893_518)]);
//! fixture.write_hashlist(&[b, a]);
//! let report = Linearizer::with_hasher(fixture.config(b), StubHasher)
//!     .run()
//!     .unwrap();
//! assert_eq!(report.blocks_written, 2);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{block, block_with, BlockSpec, PipelineFixture, StubHasher};
pub use generators::{block_from_params, BlockParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
