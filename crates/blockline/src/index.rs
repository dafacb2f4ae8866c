//! The lookup index: random access to records that are physically out of
//! order.
//!
//! Built in a single pass over every input segment, then read-only for the
//! rest of the run.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

use blockline_core::{BlockHash, BlockHasher, BlockRecord, NetMagic};
use blockline_segment::{input_segment_name, SegmentReader};

use crate::error::{LinearizeError, Result};

/// Physical location of one record: which segment, and the byte offset of
/// its frame start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    /// Path of the input segment holding the record.
    pub path: PathBuf,
    /// Byte offset of the frame start within that segment.
    pub offset: u64,
}

/// Map from block hash to physical location. Entries are created exactly
/// once during the build pass and never mutated afterwards.
#[derive(Debug, Default)]
pub struct LookupIndex {
    entries: HashMap<BlockHash, BlockLocation>,
}

impl LookupIndex {
    /// Look up a block's location.
    pub fn get(&self, hash: &BlockHash) -> Option<&BlockLocation> {
        self.entries.get(hash)
    }

    /// Number of indexed blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan the input segments and build the lookup index.
///
/// Segments are read in ascending numeric order starting at `blk0001.dat`.
/// Every record is hashed; records in the accept-set are indexed, the rest
/// are skipped. This is a full scan: cost is proportional to the total
/// number of records on disk, not to the hash-list length, and on large
/// inputs this pass dominates the runtime.
///
/// When `max_height` is set, scanning stops once the index holds
/// `max_height + 1` entries (height is one less than the block count).
/// The stop condition counts indexed entries, not hash-list coverage, so a
/// `max_height` below the true chain height stops the scan before the
/// accept-set is fully covered.
///
/// A missing segment ends the scan, unless nothing at all has been read
/// yet, which means there is no data source and is fatal.
pub fn build_index<H: BlockHasher>(
    input_dir: &Path,
    magic: NetMagic,
    accept: &HashSet<BlockHash>,
    max_height: Option<u64>,
    hasher: &H,
) -> Result<LookupIndex> {
    let max_entries = max_height.map(|h| h + 1);
    let mut entries = HashMap::new();
    let mut scanned = 0u64;
    let mut segment_no = 1u32;

    'scan: loop {
        let path = input_dir.join(input_segment_name(segment_no));
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if scanned == 0 {
                    return Err(LinearizeError::NoInputData { path });
                }
                debug!(path = %path.display(), "no more input segments");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), "scanning input segment");

        let mut reader = SegmentReader::new(BufReader::new(file), magic);
        while let Some((offset, frame)) = reader.next_frame()? {
            let record = BlockRecord::parse(frame.payload.clone())?;
            let hash = hasher.block_hash(record.header());
            scanned += 1;
            if scanned % 1000 == 0 {
                info!(scanned, "scanned blocks");
            }
            if accept.contains(&hash) {
                entries.insert(
                    hash,
                    BlockLocation {
                        path: path.clone(),
                        offset,
                    },
                );
                if let Some(max) = max_entries {
                    if entries.len() as u64 >= max {
                        debug!(indexed = entries.len(), "height cap reached");
                        break 'scan;
                    }
                }
            } else {
                trace!(block = %hash, "skipping unknown block");
            }
        }
        segment_no += 1;
    }

    Ok(LookupIndex { entries })
}
