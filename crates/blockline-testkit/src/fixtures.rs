//! Test fixtures and helpers.
//!
//! Common setup code for pipeline tests: synthetic block records with
//! chosen identifiers, and whole input trees on disk.

use std::fs;
use std::path::PathBuf;

use bytes::Bytes;
use rand::seq::SliceRandom;
use rand::Rng;
use tempfile::TempDir;

use blockline::{Config, OutputTarget, DEFAULT_MAX_SEGMENT_BYTES};
use blockline_core::{
    BlockHash, BlockHasher, Frame, NetMagic, DEFAULT_NET_MAGIC, LEGACY_HEADER_LEN,
    TIMESTAMP_OFFSET,
};
use blockline_segment::input_segment_name;

/// Offset where [`StubHasher`] reads the identifier from.
const STUB_ID_OFFSET: usize = 4;

/// A deterministic hasher for tests: the identifier is read verbatim from
/// header bytes 4..36 (just past the version field), zero-padded when the
/// header is shorter.
///
/// This makes a block's hash something a fixture can choose, rather than
/// something derived, which keeps test hash lists human-readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubHasher;

impl BlockHasher for StubHasher {
    fn block_hash(&self, header: &[u8]) -> BlockHash {
        let mut bytes = [0u8; 32];
        let end = header.len().min(STUB_ID_OFFSET + 32);
        if end > STUB_ID_OFFSET {
            bytes[..end - STUB_ID_OFFSET].copy_from_slice(&header[STUB_ID_OFFSET..end]);
        }
        BlockHash(bytes)
    }
}

/// Full description of a synthetic block record.
#[derive(Debug, Clone)]
pub struct BlockSpec {
    /// Identifier stamped into the header for [`StubHasher`] to find.
    pub id: BlockHash,
    /// Version field value.
    pub version: i32,
    /// Header timestamp.
    pub timestamp: u32,
    /// Opaque bytes appended after the header.
    pub extra: usize,
}

impl BlockSpec {
    /// A version-7 block with a small opaque tail.
    pub fn new(id: BlockHash, timestamp: u32) -> Self {
        Self {
            id,
            version: 7,
            timestamp,
            extra: 16,
        }
    }
}

/// Build a framed block record from a spec, using the default net magic.
pub fn block_with(spec: &BlockSpec) -> Frame {
    let header_len = if spec.version < 8 {
        LEGACY_HEADER_LEN
    } else {
        blockline_core::EXTENDED_HEADER_LEN
    };
    let mut bytes = vec![0u8; header_len + spec.extra];
    bytes[..4].copy_from_slice(&spec.version.to_le_bytes());
    bytes[STUB_ID_OFFSET..STUB_ID_OFFSET + 32].copy_from_slice(spec.id.as_bytes());
    bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 4].copy_from_slice(&spec.timestamp.to_le_bytes());
    for (i, b) in bytes[header_len..].iter_mut().enumerate() {
        *b = i as u8;
    }
    Frame::new(DEFAULT_NET_MAGIC, Bytes::from(bytes))
}

/// Build a default version-7 block with the given identifier.
pub fn block(id: BlockHash, timestamp: u32) -> Frame {
    block_with(&BlockSpec::new(id, timestamp))
}

/// Scatter frames across segment-sized groups in random order.
pub fn scatter<R: Rng>(frames: &[Frame], max_per_segment: usize, rng: &mut R) -> Vec<Vec<Frame>> {
    let mut shuffled: Vec<Frame> = frames.to_vec();
    shuffled.shuffle(rng);
    shuffled
        .chunks(max_per_segment.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// An input tree, hash list, and output directory in one temp directory,
/// plus the [`Config`] that wires them together.
pub struct PipelineFixture {
    dir: TempDir,
    magic: NetMagic,
}

impl PipelineFixture {
    /// Create the directory layout: `input/`, `output/`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("input")).expect("create input dir");
        fs::create_dir(dir.path().join("output")).expect("create output dir");
        Self {
            dir,
            magic: DEFAULT_NET_MAGIC,
        }
    }

    /// The input segment directory.
    pub fn input_dir(&self) -> PathBuf {
        self.dir.path().join("input")
    }

    /// The output segment directory.
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    /// Build a block frame (default spec) for this fixture's network.
    pub fn block(&self, id: BlockHash, timestamp: u32) -> Frame {
        let mut frame = block(id, timestamp);
        frame.magic = self.magic;
        frame
    }

    /// Write one numbered input segment from frames.
    pub fn write_segment(&self, n: u32, frames: &[Frame]) {
        let mut bytes = Vec::new();
        for frame in frames {
            bytes.extend(frame.encode());
        }
        fs::write(self.input_dir().join(input_segment_name(n)), bytes)
            .expect("write input segment");
    }

    /// Write the hash list in the given canonical order.
    pub fn write_hashlist(&self, order: &[BlockHash]) {
        let mut text = String::new();
        for hash in order {
            text.push_str(&hash.to_hex());
            text.push('\n');
        }
        fs::write(self.dir.path().join("hashlist.txt"), text).expect("write hash list");
    }

    /// A directory-mode config over this fixture's tree.
    pub fn config(&self, genesis: BlockHash) -> Config {
        Config {
            input_dir: self.input_dir(),
            hashlist: self.dir.path().join("hashlist.txt"),
            output: OutputTarget::Directory(self.output_dir()),
            net_magic: self.magic,
            max_height: None,
            max_segment_bytes: DEFAULT_MAX_SEGMENT_BYTES,
            stamp_mtime: false,
            split_months: false,
            verbose: false,
            genesis_hash: genesis,
        }
    }
}

impl Default for PipelineFixture {
    fn default() -> Self {
        Self::new()
    }
}
