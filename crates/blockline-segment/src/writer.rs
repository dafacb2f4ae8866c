//! The output segmenter: one open output file and its rotation policy.
//!
//! Two independent triggers can close the current segment before a record
//! is written: the size cap (directory mode only) and the month boundary.
//! Both funnel through the same close-and-reopen path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use blockline_core::{Frame, Month};

use crate::error::Result;
use crate::layout::output_segment_name;

/// Seed for the high-timestamp watermark. Predates every real record, so
/// the first record written always raises it.
const TIMESTAMP_WATERMARK_SEED: u32 = 1_408_893_517 - 315_360_000;

/// Seed for the month marker, earlier than any record month.
const MONTH_MARKER_SEED: Month = Month::new(2000, 1);

/// Where output segments are written.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Numbered `blkNNNNN.dat` files inside a directory.
    Directory(PathBuf),
    /// A single file with a fixed name. Rotation reopens (and truncates)
    /// the same path.
    File(PathBuf),
}

/// When to close the current segment and open the next one.
#[derive(Debug, Clone, Default)]
pub struct RotationPolicy {
    /// Close the current segment once the next record would push it past
    /// this many bytes. `None` disables size capping (single-file mode).
    pub max_segment_bytes: Option<u64>,
    /// Rotate whenever a record's month exceeds every month seen so far.
    pub split_months: bool,
    /// On close, stamp the segment's modification time with the highest
    /// record timestamp seen so far.
    pub stamp_mtime: bool,
}

/// Counters describing a finished output run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSummary {
    /// Number of output segments opened.
    pub segments_opened: u32,
    /// Number of frames written across all segments.
    pub frames_written: u64,
    /// Total bytes written, frame headers included.
    pub bytes_written: u64,
}

struct OpenSegment {
    writer: BufWriter<File>,
    path: PathBuf,
}

/// Owns the currently-open output file and applies the rotation policy.
pub struct OutputSegmenter {
    target: OutputTarget,
    policy: RotationPolicy,
    current: Option<OpenSegment>,
    next_index: u32,
    segment_bytes: u64,
    high_timestamp: u32,
    month: Month,
    segments_opened: u32,
    frames_written: u64,
    bytes_written: u64,
}

impl OutputSegmenter {
    /// Create a segmenter; no file is opened until the first record.
    pub fn new(target: OutputTarget, policy: RotationPolicy) -> Self {
        Self {
            target,
            policy,
            current: None,
            next_index: 0,
            segment_bytes: 0,
            high_timestamp: TIMESTAMP_WATERMARK_SEED,
            month: MONTH_MARKER_SEED,
            segments_opened: 0,
            frames_written: 0,
            bytes_written: 0,
        }
    }

    /// Write one record, rotating first if either trigger fires.
    ///
    /// The frame is re-emitted byte-for-byte: 8-byte header, then payload.
    /// `timestamp` is the record's header timestamp; it drives the month
    /// trigger and the mtime watermark but is never written anywhere.
    pub fn append(&mut self, frame: &Frame, timestamp: u32) -> Result<()> {
        if self.size_cap_hit(frame.payload_len()) {
            self.close_current()?;
        }

        if self.policy.split_months {
            let month = Month::from_timestamp(timestamp);
            if month > self.month {
                debug!(%month, "month boundary, rotating output");
                self.month = month;
                if self.current.is_some() {
                    self.close_current()?;
                }
            }
        }

        if self.current.is_none() {
            self.open_next()?;
        }
        if let Some(segment) = self.current.as_mut() {
            segment.writer.write_all(&frame.header_bytes())?;
            segment.writer.write_all(&frame.payload)?;
        }

        let encoded = frame.encoded_len() as u64;
        self.segment_bytes += encoded;
        self.bytes_written += encoded;
        self.frames_written += 1;
        if timestamp > self.high_timestamp {
            self.high_timestamp = timestamp;
        }
        Ok(())
    }

    /// Close the current segment, if any, and return the run counters.
    pub fn finish(mut self) -> Result<OutputSummary> {
        self.close_current()?;
        Ok(OutputSummary {
            segments_opened: self.segments_opened,
            frames_written: self.frames_written,
            bytes_written: self.bytes_written,
        })
    }

    fn size_cap_hit(&self, payload_len: usize) -> bool {
        match (&self.current, self.policy.max_segment_bytes) {
            (Some(_), Some(cap)) => self.segment_bytes + payload_len as u64 > cap,
            _ => false,
        }
    }

    fn open_next(&mut self) -> Result<()> {
        let path = match &self.target {
            OutputTarget::Directory(dir) => dir.join(output_segment_name(self.next_index)),
            OutputTarget::File(path) => path.clone(),
        };
        info!(path = %path.display(), "output segment");
        let file = File::create(&path)?;
        self.segment_bytes = 0;
        self.segments_opened += 1;
        self.current = Some(OpenSegment {
            writer: BufWriter::new(file),
            path,
        });
        Ok(())
    }

    fn close_current(&mut self) -> Result<()> {
        if let Some(mut segment) = self.current.take() {
            segment.writer.flush()?;
            if self.policy.stamp_mtime {
                debug!(path = %segment.path.display(), mtime = self.high_timestamp, "stamping segment");
                stamp_times(segment.writer.get_ref(), self.high_timestamp)?;
            }
            self.next_index += 1;
            self.segment_bytes = 0;
        }
        Ok(())
    }
}

/// Set a closed segment's times to (now, highest record timestamp).
fn stamp_times(file: &File, high_timestamp: u32) -> std::io::Result<()> {
    let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(u64::from(high_timestamp));
    let times = fs::FileTimes::new()
        .set_accessed(SystemTime::now())
        .set_modified(modified);
    file.set_times(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockline_core::DEFAULT_NET_MAGIC;
    use bytes::Bytes;

    // Timestamps above the watermark seed, one in 2014-08 and one in 2014-09.
    const TS_AUG: u32 = 1_408_893_517;
    const TS_SEP: u32 = 1_409_529_600;

    fn frame(len: usize) -> Frame {
        Frame::new(DEFAULT_NET_MAGIC, Bytes::from(vec![0xaa; len]))
    }

    fn segment_sizes(dir: &std::path::Path) -> Vec<u64> {
        let mut sizes = Vec::new();
        for n in 0.. {
            let path = dir.join(output_segment_name(n));
            match std::fs::metadata(&path) {
                Ok(meta) => sizes.push(meta.len()),
                Err(_) => break,
            }
        }
        sizes
    }

    #[test]
    fn test_size_cap_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy {
            max_segment_bytes: Some(216),
            ..RotationPolicy::default()
        };
        let mut out = OutputSegmenter::new(OutputTarget::Directory(dir.path().into()), policy);

        for _ in 0..5 {
            out.append(&frame(100), TS_AUG).unwrap();
        }
        let summary = out.finish().unwrap();

        // Two full segments of two frames each, one trailing segment.
        assert_eq!(summary.segments_opened, 3);
        assert_eq!(summary.frames_written, 5);
        assert_eq!(summary.bytes_written, 5 * 108);
        assert_eq!(segment_sizes(dir.path()), vec![216, 216, 108]);
    }

    #[test]
    fn test_oversized_record_written_whole() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy {
            max_segment_bytes: Some(50),
            ..RotationPolicy::default()
        };
        let mut out = OutputSegmenter::new(OutputTarget::Directory(dir.path().into()), policy);

        out.append(&frame(100), TS_AUG).unwrap();
        out.append(&frame(100), TS_AUG).unwrap();
        let summary = out.finish().unwrap();

        assert_eq!(summary.segments_opened, 2);
        assert_eq!(segment_sizes(dir.path()), vec![108, 108]);
    }

    #[test]
    fn test_month_split_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy {
            split_months: true,
            ..RotationPolicy::default()
        };
        let mut out = OutputSegmenter::new(OutputTarget::Directory(dir.path().into()), policy);

        out.append(&frame(10), TS_AUG).unwrap();
        out.append(&frame(10), TS_AUG).unwrap();
        out.append(&frame(10), TS_SEP).unwrap();
        let summary = out.finish().unwrap();

        assert_eq!(summary.segments_opened, 2);
        assert_eq!(segment_sizes(dir.path()), vec![36, 18]);
    }

    #[test]
    fn test_month_split_ignores_older_records() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy {
            split_months: true,
            ..RotationPolicy::default()
        };
        let mut out = OutputSegmenter::new(OutputTarget::Directory(dir.path().into()), policy);

        out.append(&frame(10), TS_SEP).unwrap();
        // An August record after September: no new month, no rotation.
        out.append(&frame(10), TS_AUG).unwrap();
        let summary = out.finish().unwrap();

        assert_eq!(summary.segments_opened, 1);
    }

    #[test]
    fn test_single_file_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bootstrap.dat");
        let mut out = OutputSegmenter::new(
            OutputTarget::File(path.clone()),
            RotationPolicy::default(),
        );

        for _ in 0..10 {
            out.append(&frame(100), TS_AUG).unwrap();
        }
        let summary = out.finish().unwrap();

        assert_eq!(summary.segments_opened, 1);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 10 * 108);
    }

    #[test]
    fn test_mtime_stamping() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy {
            stamp_mtime: true,
            ..RotationPolicy::default()
        };
        let mut out = OutputSegmenter::new(OutputTarget::Directory(dir.path().into()), policy);

        out.append(&frame(10), TS_AUG).unwrap();
        out.append(&frame(10), TS_AUG - 1000).unwrap();
        out.finish().unwrap();

        let meta = std::fs::metadata(dir.path().join(output_segment_name(0))).unwrap();
        let modified = meta
            .modified()
            .unwrap()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap();
        // Watermark keeps the highest timestamp, not the last one.
        assert_eq!(modified.as_secs(), u64::from(TS_AUG));
    }

    #[test]
    fn test_no_records_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputSegmenter::new(
            OutputTarget::Directory(dir.path().into()),
            RotationPolicy::default(),
        );
        let summary = out.finish().unwrap();
        assert_eq!(summary.segments_opened, 0);
        assert_eq!(segment_sizes(dir.path()), Vec::<u64>::new());
    }
}
