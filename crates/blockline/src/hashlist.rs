//! The canonical hash list: the externally-supplied output order.
//!
//! One hex hash per line, position defining chain height. The pipeline
//! only consumes this order; producing it is someone else's job.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use blockline_core::BlockHash;

use crate::error::{LinearizeError, Result};

/// An ordered list of block hashes defining the canonical output order.
#[derive(Debug, Clone, Default)]
pub struct HashList {
    hashes: Vec<BlockHash>,
}

impl HashList {
    /// Load a hash list file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let list = Self::parse(&text)?;
        info!(path = %path.display(), hashes = list.len(), "read hash list");
        Ok(list)
    }

    /// Parse hash list text. Blank lines are skipped; anything else must
    /// be a 64-digit hex hash.
    pub fn parse(text: &str) -> Result<Self> {
        let mut hashes = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let hash = BlockHash::from_hex(line).map_err(|_| {
                LinearizeError::InvalidHashListEntry {
                    line: i + 1,
                    value: line.to_string(),
                }
            })?;
            hashes.push(hash);
        }
        Ok(Self { hashes })
    }

    /// Number of hashes in the list.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Iterate hashes in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockHash> {
        self.hashes.iter()
    }

    /// The accept-set: every hash the index builder may record.
    pub fn accept_set(&self) -> HashSet<BlockHash> {
        self.hashes.iter().copied().collect()
    }
}

impl From<Vec<BlockHash>> for HashList {
    fn from(hashes: Vec<BlockHash>) -> Self {
        Self { hashes }
    }
}
