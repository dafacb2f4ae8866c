//! Proptest generators for property-based testing.

use proptest::prelude::*;

use blockline_core::{BlockHash, Frame, NetMagic};

use crate::fixtures::{block_with, BlockSpec};

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a random net magic whose first byte is never zero, since a
/// zero first byte is the segment terminator pattern.
pub fn net_magic() -> impl Strategy<Value = NetMagic> {
    any::<[u8; 4]>().prop_map(|mut bytes| {
        bytes[0] |= 0x01;
        NetMagic(bytes)
    })
}

/// Generate a record version spanning both header layouts.
pub fn version() -> impl Strategy<Value = i32> {
    -2i32..=20
}

/// Generate a plausible record timestamp.
pub fn timestamp() -> impl Strategy<Value = u32> {
    1_000_000_000u32..=1_600_000_000
}

/// Generate an opaque-tail length.
pub fn extra_len() -> impl Strategy<Value = usize> {
    0usize..=512
}

/// Parameters for generating one block record.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub id: BlockHash,
    pub version: i32,
    pub timestamp: u32,
    pub extra: usize,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (block_hash(), version(), timestamp(), extra_len())
            .prop_map(|(id, version, timestamp, extra)| BlockParams {
                id,
                version,
                timestamp,
                extra,
            })
            .boxed()
    }
}

/// Build the framed record a [`BlockParams`] describes.
pub fn block_from_params(params: &BlockParams) -> Frame {
    block_with(&BlockSpec {
        id: params.id,
        version: params.version,
        timestamp: params.timestamp,
        extra: params.extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::StubHasher;
    use blockline_core::{
        BlockHasher, BlockRecord, EXTENDED_HEADER_LEN, LEGACY_HEADER_LEN,
    };

    proptest! {
        #[test]
        fn prop_stub_hash_recovers_generated_id(params: BlockParams) {
            let frame = block_from_params(&params);
            let record = BlockRecord::parse(frame.payload.clone()).unwrap();
            prop_assert_eq!(StubHasher.block_hash(record.header()), params.id);
        }

        #[test]
        fn prop_header_len_follows_version(params: BlockParams) {
            let frame = block_from_params(&params);
            let record = BlockRecord::parse(frame.payload.clone()).unwrap();
            let expected = if params.version < 8 {
                LEGACY_HEADER_LEN
            } else {
                EXTENDED_HEADER_LEN
            };
            prop_assert_eq!(record.header_len(), expected);
        }

        #[test]
        fn prop_generated_records_roundtrip_timestamp(params: BlockParams) {
            let frame = block_from_params(&params);
            let record = BlockRecord::parse(frame.payload.clone()).unwrap();
            prop_assert_eq!(record.timestamp().unwrap(), params.timestamp);
        }

        #[test]
        fn prop_frame_encoding_roundtrips(params: BlockParams) {
            let frame = block_from_params(&params);
            let encoded = frame.encode();
            let mut cursor = std::io::Cursor::new(encoded);
            let decoded = blockline_segment::read_frame(&mut cursor, frame.magic)
                .unwrap()
                .unwrap();
            prop_assert_eq!(decoded, frame);
        }
    }
}
