//! Golden test vectors for the framing and hashing path.
//!
//! Every vector is generated from fixed inputs, so any change to frame
//! encoding, header-length selection, or the production hasher shows up as
//! a vector mismatch. Vectors serialize to JSON for use outside this
//! workspace.

use serde::{Deserialize, Serialize};

use blockline_core::{Blake3Hasher, BlockHasher, BlockRecord, Frame, DEFAULT_NET_MAGIC};
use bytes::Bytes;

/// A single golden test vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub version: i32,
    pub timestamp: u32,
    pub payload: String, // hex

    // Derived outputs
    pub frame: String, // hex, default net magic
    pub header_len: usize,
    pub block_hash: String, // hex, Blake3 over the header bytes
    pub month: String,      // YYYY-MM
}

/// Generate a golden vector from inputs.
fn generate_vector(name: &str, description: &str, version: i32, timestamp: u32, extra: usize) -> GoldenVector {
    let spec = crate::fixtures::BlockSpec {
        id: blockline_core::BlockHash::from_bytes([0x42; 32]),
        version,
        timestamp,
        extra,
    };
    let frame = crate::fixtures::block_with(&spec);
    let record = BlockRecord::parse(frame.payload.clone()).expect("vector payload parses");
    let hash = Blake3Hasher.block_hash(record.header());

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        version,
        timestamp,
        payload: hex::encode(&frame.payload),
        frame: hex::encode(frame.encode()),
        header_len: record.header_len(),
        block_hash: hash.to_hex(),
        month: record.month().expect("vector has a full header").to_string(),
    }
}

/// Generate all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        generate_vector(
            "legacy_header_floor",
            "Oldest legacy-header version, bare header",
            1,
            1_093_533_518,
            0,
        ),
        generate_vector(
            "legacy_header_last",
            "Version 7, the last with the 80-byte header",
            7,
            1_408_893_517,
            32,
        ),
        generate_vector(
            "extended_header_first",
            "Version 8, the first with the 88-byte header",
            8,
            1_408_893_517,
            32,
        ),
        generate_vector(
            "extended_header_later",
            "Version 9 with a large opaque tail",
            9,
            1_409_529_600,
            400,
        ),
        generate_vector(
            "negative_version",
            "Negative versions fall in the legacy layout",
            -1,
            1_262_304_000,
            8,
        ),
    ]
}

/// Re-derive every vector's outputs and check them against the stored
/// values. Returns the number of vectors verified.
pub fn verify_all_vectors() -> Result<usize, String> {
    let vectors = all_vectors();
    for vector in &vectors {
        let payload = hex::decode(&vector.payload).map_err(|e| format!("{}: {e}", vector.name))?;
        let record = BlockRecord::parse(Bytes::from(payload))
            .map_err(|e| format!("{}: {e}", vector.name))?;

        if record.version() != vector.version {
            return Err(format!("{}: version drifted", vector.name));
        }
        if record.header_len() != vector.header_len {
            return Err(format!("{}: header length drifted", vector.name));
        }
        let hash = Blake3Hasher.block_hash(record.header());
        if hash.to_hex() != vector.block_hash {
            return Err(format!("{}: block hash drifted", vector.name));
        }

        let frame = Frame::new(DEFAULT_NET_MAGIC, record.as_bytes().to_vec().into());
        if hex::encode(frame.encode()) != vector.frame {
            return Err(format!("{}: frame encoding drifted", vector.name));
        }
    }
    Ok(vectors.len())
}
