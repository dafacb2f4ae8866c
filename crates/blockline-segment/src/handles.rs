//! Read-handle cache for reassembly.
//!
//! The assembler revisits the same handful of input segments in an order
//! dictated by the canonical hash list, so handles are opened lazily and
//! kept for the whole run. The cache is bounded by the number of distinct
//! input segments touched; every handle is released when the cache drops,
//! on success and error paths alike.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Lazily-populated map from segment path to its open read handle.
#[derive(Debug, Default)]
pub struct HandleCache {
    handles: HashMap<PathBuf, File>,
}

impl HandleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle for a segment, opening it on first use.
    pub fn get(&mut self, path: &Path) -> io::Result<&mut File> {
        match self.handles.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(path = %path.display(), "opening input segment for reassembly");
                let file = File::open(path)?;
                Ok(entry.insert(file))
            }
        }
    }

    /// Number of handles currently open.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the cache holds no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reuses_open_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.dat");
        let path_b = dir.path().join("b.dat");
        std::fs::File::create(&path_a).unwrap().write_all(b"a").unwrap();
        std::fs::File::create(&path_b).unwrap().write_all(b"b").unwrap();

        let mut cache = HandleCache::new();
        cache.get(&path_a).unwrap();
        cache.get(&path_b).unwrap();
        cache.get(&path_a).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = HandleCache::new();
        assert!(cache.get(&dir.path().join("absent.dat")).is_err());
        assert!(cache.is_empty());
    }
}
