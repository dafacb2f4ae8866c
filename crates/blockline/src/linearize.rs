//! The Linearizer: the pipeline front door.
//!
//! Drives the two phases in order: build the lookup index, then walk the
//! canonical order, re-verify every record, and stream it to the output
//! segmenter.

use std::io::{Seek, SeekFrom};

use tracing::info;

use blockline_core::{BlockHasher, BlockRecord, Frame};
use blockline_segment::{read_frame, HandleCache, OutputSegmenter};

use crate::config::Config;
use crate::error::{LinearizeError, Result};
use crate::hashlist::HashList;
use crate::index::{build_index, BlockLocation, LookupIndex};

/// Counters describing a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Blocks located during the index pass.
    pub blocks_indexed: usize,
    /// Blocks re-verified and written.
    pub blocks_written: u64,
    /// Total output bytes, frame headers included.
    pub bytes_written: u64,
    /// Output segments opened.
    pub segments_opened: u32,
}

/// Runs the linearization pipeline for one configuration.
///
/// The hasher is injected so the pipeline can run against any network's
/// digest, or a deterministic stub in tests.
pub struct Linearizer<H> {
    config: Config,
    hasher: H,
}

impl Linearizer<blockline_core::Blake3Hasher> {
    /// Create a linearizer with the default production hasher.
    pub fn new(config: Config) -> Self {
        Self::with_hasher(config, blockline_core::Blake3Hasher)
    }
}

impl<H: BlockHasher> Linearizer<H> {
    /// Create a linearizer with an explicit hasher.
    pub fn with_hasher(config: Config, hasher: H) -> Self {
        Self { config, hasher }
    }

    /// The configuration this linearizer runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline: load the hash list, check the genesis
    /// precondition, build the index, then copy blocks in canonical order.
    ///
    /// Aborts on the first integrity, protocol, or lookup violation,
    /// leaving whatever output was already verified and written.
    pub fn run(&self) -> Result<RunReport> {
        let order = HashList::load(&self.config.hashlist)?;
        let accept = order.accept_set();
        if !accept.contains(&self.config.genesis_hash) {
            return Err(LinearizeError::MissingGenesis(self.config.genesis_hash));
        }

        let index = build_index(
            &self.config.input_dir,
            self.config.net_magic,
            &accept,
            self.config.max_height,
            &self.hasher,
        )?;
        info!(indexed = index.len(), wanted = order.len(), "lookup index built");

        self.copy_blocks(&order, &index)
    }

    /// Walk the canonical order and emit every block through the output
    /// segmenter, re-verifying each one against its expected hash.
    fn copy_blocks(&self, order: &HashList, index: &LookupIndex) -> Result<RunReport> {
        let mut handles = HandleCache::new();
        let mut out = OutputSegmenter::new(self.config.output.clone(), self.config.rotation_policy());
        let mut written = 0u64;

        for hash in order.iter() {
            let location = index
                .get(hash)
                .ok_or(LinearizeError::UnresolvedBlock(*hash))?;
            let frame = self.reread_frame(&mut handles, location)?;

            let record = BlockRecord::parse(frame.payload.clone())?;
            let actual = self.hasher.block_hash(record.header());
            if actual != *hash {
                return Err(LinearizeError::BlockMismatch {
                    expected: *hash,
                    actual,
                    path: location.path.clone(),
                    offset: location.offset,
                });
            }

            let timestamp = record.timestamp()?;
            out.append(&frame, timestamp)?;
            written += 1;
            if written % 1000 == 0 {
                info!(written, "wrote blocks");
            }
        }

        let summary = out.finish()?;
        info!(
            blocks = summary.frames_written,
            bytes = summary.bytes_written,
            segments = summary.segments_opened,
            "linearization complete"
        );
        Ok(RunReport {
            blocks_indexed: index.len(),
            blocks_written: summary.frames_written,
            bytes_written: summary.bytes_written,
            segments_opened: summary.segments_opened,
        })
    }

    /// Re-read one frame at its indexed location.
    fn reread_frame(&self, handles: &mut HandleCache, location: &BlockLocation) -> Result<Frame> {
        let file = handles.get(&location.path)?;
        file.seek(SeekFrom::Start(location.offset))?;
        read_frame(file, self.config.net_magic)?.ok_or_else(|| LinearizeError::TruncatedBlock {
            path: location.path.clone(),
            offset: location.offset,
        })
    }
}
