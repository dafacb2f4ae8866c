//! Frame encoding: the magic+length+payload unit of a segment file.
//!
//! Input and output segments use the same framing, so a frame read from an
//! input segment can be re-emitted byte-for-byte.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::NetMagic;

/// Length of the on-disk frame header: 4 bytes of magic + 4 bytes of
/// little-endian payload length.
pub const FRAME_HEADER_LEN: usize = 8;

/// The decoded 8-byte prefix of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Network magic as it appeared on disk.
    pub magic: NetMagic,
    /// Payload length in bytes.
    pub length: u32,
}

impl FrameHeader {
    /// Decode a frame header from its 8 on-disk bytes.
    pub fn parse(bytes: &[u8; FRAME_HEADER_LEN]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        let mut len = [0u8; 4];
        len.copy_from_slice(&bytes[4..]);
        Self {
            magic: NetMagic(magic),
            length: u32::from_le_bytes(len),
        }
    }

    /// Encode back to the 8 on-disk bytes.
    pub fn encode(&self) -> [u8; FRAME_HEADER_LEN] {
        let mut out = [0u8; FRAME_HEADER_LEN];
        out[..4].copy_from_slice(&self.magic.0);
        out[4..].copy_from_slice(&self.length.to_le_bytes());
        out
    }
}

/// One complete frame: header plus payload.
///
/// The payload is kept verbatim; re-encoding a frame reproduces exactly the
/// bytes it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Network magic this frame was framed with.
    pub magic: NetMagic,
    /// The raw record bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame around a payload.
    pub fn new(magic: NetMagic, payload: Bytes) -> Self {
        Self { magic, payload }
    }

    /// Payload length in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Total on-disk length: header plus payload.
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_LEN + self.payload.len()
    }

    /// The 8-byte on-disk header for this frame.
    pub fn header_bytes(&self) -> [u8; FRAME_HEADER_LEN] {
        FrameHeader {
            magic: self.magic,
            length: self.payload.len() as u32,
        }
        .encode()
    }

    /// Encode the whole frame (header plus payload) to a buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.header_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_NET_MAGIC;
    use proptest::prelude::*;

    #[test]
    fn test_header_roundtrip() {
        let header = FrameHeader {
            magic: DEFAULT_NET_MAGIC,
            length: 0x0001_0203,
        };
        let encoded = header.encode();
        assert_eq!(FrameHeader::parse(&encoded), header);
    }

    #[test]
    fn test_header_length_is_little_endian() {
        let header = FrameHeader {
            magic: DEFAULT_NET_MAGIC,
            length: 300,
        };
        let encoded = header.encode();
        assert_eq!(&encoded[4..], &[0x2c, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_frame_encode_prepends_header() {
        let frame = Frame::new(DEFAULT_NET_MAGIC, Bytes::from_static(b"abc"));
        let encoded = frame.encode();
        assert_eq!(encoded.len(), frame.encoded_len());
        assert_eq!(&encoded[..4], DEFAULT_NET_MAGIC.as_bytes());
        assert_eq!(&encoded[4..8], &3u32.to_le_bytes());
        assert_eq!(&encoded[8..], b"abc");
    }

    proptest! {
        #[test]
        fn prop_header_roundtrip(magic in any::<[u8; 4]>(), length in any::<u32>()) {
            let header = FrameHeader {
                magic: NetMagic(magic),
                length,
            };
            prop_assert_eq!(FrameHeader::parse(&header.encode()), header);
        }
    }
}
