//! Sequential frame reading from segment files.
//!
//! Reads are forward-only. End of usable data is signalled in-band: a frame
//! slot whose first magic byte is absent or zero ends the segment, which is
//! not an error, and the caller moves on to the next numbered file. A magic
//! mismatch, by contrast, is always fatal.

use std::io::{ErrorKind, Read};

use bytes::Bytes;
use blockline_core::{Frame, FrameHeader, NetMagic, FRAME_HEADER_LEN};

use crate::error::{Result, SegmentError};

/// Decode one frame from the reader's current position.
///
/// Returns `Ok(None)` at end of segment: no bytes left, fewer than 8 header
/// bytes left, or a first byte of zero (the terminator pattern written into
/// preallocated segment tails). Returns an error for a magic mismatch or a
/// payload cut short mid-frame.
pub fn read_frame<R: Read>(reader: &mut R, magic: NetMagic) -> Result<Option<Frame>> {
    let mut header = [0u8; FRAME_HEADER_LEN];
    let n = read_fill(reader, &mut header)?;
    if n == 0 || header[0] == 0 || n < FRAME_HEADER_LEN {
        return Ok(None);
    }

    let header = FrameHeader::parse(&header);
    if header.magic != magic {
        return Err(SegmentError::InvalidMagic {
            expected: magic,
            actual: header.magic,
        });
    }

    let expected = header.length as usize;
    let mut payload = vec![0u8; expected];
    let actual = read_fill(reader, &mut payload)?;
    if actual < expected {
        return Err(SegmentError::TruncatedFrame { expected, actual });
    }

    Ok(Some(Frame::new(magic, Bytes::from(payload))))
}

/// A frame reader over one segment file that tracks byte offsets.
///
/// Each decoded frame is returned together with the offset of its frame
/// start, which is what the lookup index records for random re-access.
pub struct SegmentReader<R> {
    inner: R,
    magic: NetMagic,
    offset: u64,
}

impl<R: Read> SegmentReader<R> {
    /// Wrap a reader positioned at offset 0 of a segment file.
    pub fn new(inner: R, magic: NetMagic) -> Self {
        Self {
            inner,
            magic,
            offset: 0,
        }
    }

    /// Byte offset of the next frame slot.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decode the next frame, returning it with its start offset.
    pub fn next_frame(&mut self) -> Result<Option<(u64, Frame)>> {
        let start = self.offset;
        match read_frame(&mut self.inner, self.magic)? {
            Some(frame) => {
                self.offset = start + frame.encoded_len() as u64;
                Ok(Some((start, frame)))
            }
            None => Ok(None),
        }
    }
}

/// Read until the buffer is full or EOF, returning the bytes filled.
fn read_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockline_core::DEFAULT_NET_MAGIC;
    use std::io::Cursor;

    fn frame_bytes(payload: &[u8]) -> Vec<u8> {
        Frame::new(DEFAULT_NET_MAGIC, Bytes::copy_from_slice(payload)).encode()
    }

    #[test]
    fn test_reads_frames_in_order() {
        let mut data = frame_bytes(b"first");
        data.extend(frame_bytes(b"second"));
        let mut reader = SegmentReader::new(Cursor::new(data), DEFAULT_NET_MAGIC);

        let (offset, frame) = reader.next_frame().unwrap().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(&frame.payload[..], b"first");

        let (offset, frame) = reader.next_frame().unwrap().unwrap();
        assert_eq!(offset, 13);
        assert_eq!(&frame.payload[..], b"second");

        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_zero_terminator_ends_segment() {
        let mut data = frame_bytes(b"only");
        data.extend([0u8; 64]);
        let mut reader = SegmentReader::new(Cursor::new(data), DEFAULT_NET_MAGIC);

        assert!(reader.next_frame().unwrap().is_some());
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_partial_header_ends_segment() {
        let mut data = frame_bytes(b"only");
        data.extend(&DEFAULT_NET_MAGIC.0[..3]);
        let mut reader = SegmentReader::new(Cursor::new(data), DEFAULT_NET_MAGIC);

        assert!(reader.next_frame().unwrap().is_some());
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_empty_input_ends_segment() {
        let mut cursor = Cursor::new(Vec::new());
        assert!(read_frame(&mut cursor, DEFAULT_NET_MAGIC).unwrap().is_none());
    }

    #[test]
    fn test_wrong_magic_is_fatal() {
        let data = Frame::new(NetMagic([0xde, 0xad, 0xbe, 0xef]), Bytes::from_static(b"x")).encode();
        let mut cursor = Cursor::new(data);
        let err = read_frame(&mut cursor, DEFAULT_NET_MAGIC).unwrap_err();
        assert!(matches!(err, SegmentError::InvalidMagic { .. }));
    }

    #[test]
    fn test_truncated_payload_is_fatal() {
        let mut data = frame_bytes(b"full payload");
        data.truncate(data.len() - 4);
        let mut cursor = Cursor::new(data);
        let err = read_frame(&mut cursor, DEFAULT_NET_MAGIC).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::TruncatedFrame {
                expected: 12,
                actual: 8
            }
        ));
    }
}
