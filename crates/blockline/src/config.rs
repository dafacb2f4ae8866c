//! Run configuration, parsed once from a key=value file.
//!
//! The parsed [`Config`] is an immutable value passed explicitly to each
//! pipeline stage; nothing reads settings after construction.
//!
//! Recognized keys: `input`, `hashlist`, `output`, `output_file`,
//! `netmagic`, `max_height`, `max_out_sz`, `file_timestamp`,
//! `split_timestamp`, `verbose`, `hash_genesis`. Lines starting with `#`
//! and blank lines are ignored, as are unknown keys.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use blockline_core::{BlockHash, NetMagic, DEFAULT_NET_MAGIC};
use blockline_segment::{OutputTarget, RotationPolicy};

/// Size cap per output segment when `max_out_sz` is not set.
pub const DEFAULT_MAX_SEGMENT_BYTES: u64 = 1_000_000_000;

/// Genesis hash assumed when `hash_genesis` is not set.
pub const DEFAULT_GENESIS_HASH: BlockHash = BlockHash([
    0x1a, 0xaa, 0x07, 0xc5, 0x80, 0x5c, 0x4e, 0xa8, 0xae, 0xe3, 0x3c, 0x9f, 0x16, 0xa0, 0x57,
    0x21, 0x5b, 0xc0, 0x6d, 0x59, 0xf9, 0x4f, 0xc1, 0x21, 0x32, 0xc6, 0x13, 0x5e, 0xd2, 0xd9,
    0x71, 0x2a,
]);

/// Errors from configuration parsing. All of them abort before any I/O on
/// block data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("missing output target: set either output or output_file")]
    MissingOutput,

    #[error("output and output_file are mutually exclusive")]
    ConflictingOutput,

    #[error("setting {key} should be true/false: got {value:?}")]
    InvalidFlag { key: &'static str, value: String },

    #[error("setting {key} should be an integer: got {value:?}")]
    InvalidInteger { key: &'static str, value: String },

    #[error("setting netmagic should be 8 hex digits: got {value:?}")]
    InvalidMagic { value: String },

    #[error("setting hash_genesis should be 64 hex digits: got {value:?}")]
    InvalidHash { value: String },
}

/// Immutable configuration for one linearization run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the numbered input segments.
    pub input_dir: PathBuf,
    /// Path to the canonical hash list.
    pub hashlist: PathBuf,
    /// Where output segments are written.
    pub output: OutputTarget,
    /// Network magic every frame must carry.
    pub net_magic: NetMagic,
    /// Cap on output chain height; `None` is unlimited.
    pub max_height: Option<u64>,
    /// Size cap per output segment (directory mode only).
    pub max_segment_bytes: u64,
    /// Stamp closed segments' mtime with the highest record timestamp.
    pub stamp_mtime: bool,
    /// Rotate output on calendar-month boundaries.
    pub split_months: bool,
    /// Extra logging requested in the config file.
    pub verbose: bool,
    /// Hash expected to head the canonical order.
    pub genesis_hash: BlockHash,
}

impl Config {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse config text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut input_dir = None;
        let mut hashlist = None;
        let mut output_dir: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut net_magic = None;
        let mut max_height = None;
        let mut max_segment_bytes = None;
        let mut stamp_mtime = false;
        let mut split_months = false;
        let mut verbose = false;
        let mut genesis_hash = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "input" => input_dir = Some(PathBuf::from(value)),
                "hashlist" => hashlist = Some(PathBuf::from(value)),
                "output" => output_dir = Some(PathBuf::from(value)),
                "output_file" => output_file = Some(PathBuf::from(value)),
                "netmagic" => {
                    net_magic = Some(NetMagic::from_hex(value).map_err(|_| {
                        ConfigError::InvalidMagic {
                            value: value.to_string(),
                        }
                    })?);
                }
                "max_height" => max_height = Some(parse_integer("max_height", value)?),
                "max_out_sz" => max_segment_bytes = Some(parse_integer("max_out_sz", value)?),
                "file_timestamp" => stamp_mtime = parse_flag("file_timestamp", value)?,
                "split_timestamp" => split_months = parse_flag("split_timestamp", value)?,
                "verbose" => verbose = parse_flag("verbose", value)?,
                "hash_genesis" => {
                    genesis_hash = Some(BlockHash::from_hex(value).map_err(|_| {
                        ConfigError::InvalidHash {
                            value: value.to_string(),
                        }
                    })?);
                }
                _ => debug!(key, "ignoring unknown setting"),
            }
        }

        let output = match (output_dir, output_file) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingOutput),
            (Some(dir), None) => OutputTarget::Directory(dir),
            (None, Some(file)) => OutputTarget::File(file),
            (None, None) => return Err(ConfigError::MissingOutput),
        };

        Ok(Self {
            input_dir: input_dir.unwrap_or_else(|| PathBuf::from("input")),
            hashlist: hashlist.unwrap_or_else(|| PathBuf::from("hashlist.txt")),
            output,
            net_magic: net_magic.unwrap_or(DEFAULT_NET_MAGIC),
            max_height,
            max_segment_bytes: max_segment_bytes.unwrap_or(DEFAULT_MAX_SEGMENT_BYTES),
            stamp_mtime,
            split_months,
            verbose,
            genesis_hash: genesis_hash.unwrap_or(DEFAULT_GENESIS_HASH),
        })
    }

    /// The rotation policy this config implies. Size capping only applies
    /// in directory mode; a single fixed-name output is never size-capped.
    pub fn rotation_policy(&self) -> RotationPolicy {
        let max_segment_bytes = match &self.output {
            OutputTarget::Directory(_) => Some(self.max_segment_bytes),
            OutputTarget::File(_) => None,
        };
        RotationPolicy {
            max_segment_bytes,
            split_months: self.split_months,
            stamp_mtime: self.stamp_mtime,
        }
    }
}

fn parse_integer(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidInteger {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
