//! Block hashing as an injected capability.
//!
//! The pipeline never hard-codes a digest function: everything that needs a
//! block identity goes through [`BlockHasher`], so the core stays testable
//! with deterministic stubs and the production hash is swappable per
//! network.

use crate::types::BlockHash;

/// Derives a block's canonical identifier from its header bytes.
///
/// Implementations must be pure: the same header bytes always produce the
/// same hash.
pub trait BlockHasher {
    /// Compute the identifier over the record's header bytes.
    fn block_hash(&self, header: &[u8]) -> BlockHash;
}

/// The default production hasher: Blake3 over the header bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl BlockHasher for Blake3Hasher {
    fn block_hash(&self, header: &[u8]) -> BlockHash {
        BlockHash(*blake3::hash(header).as_bytes())
    }
}

impl<H: BlockHasher + ?Sized> BlockHasher for &H {
    fn block_hash(&self, header: &[u8]) -> BlockHash {
        (**self).block_hash(header)
    }
}
