//! Named byte streams.
//!
//! An MPP file is a compound document holding many named streams, grouped
//! in directories (`TBkndCal/FixedMeta`, `TBkndCal/Var2Data`, ...). Opening
//! the compound document is somebody else's job; the decoders here only need
//! to ask for a stream by path and get its bytes back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{MppError, Result};

/// Separator between directory and stream names in a stream path.
pub const PATH_SEPARATOR: char = '/';

/// Source of named streams.
pub trait StreamSource {
    /// Read the whole of the stream at `path`.
    fn read_stream(&self, path: &str) -> Result<Vec<u8>>;

    /// Whether a stream exists at `path`.
    fn has_stream(&self, path: &str) -> bool;
}

/// Join a directory and a stream name into a stream path.
#[must_use]
pub fn stream_path(directory: &str, name: &str) -> String {
    if directory.is_empty() {
        name.to_string()
    } else {
        format!("{directory}{PATH_SEPARATOR}{name}")
    }
}

/// Streams held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStreams {
    streams: BTreeMap<String, Vec<u8>>,
}

impl MemoryStreams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a stream.
    pub fn insert(&mut self, path: impl Into<String>, data: Vec<u8>) {
        self.streams.insert(path.into(), data);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_stream(mut self, path: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl StreamSource for MemoryStreams {
    fn read_stream(&self, path: &str) -> Result<Vec<u8>> {
        self.streams
            .get(path)
            .cloned()
            .ok_or_else(|| MppError::stream_not_found(path))
    }

    fn has_stream(&self, path: &str) -> bool {
        self.streams.contains_key(path)
    }
}

/// Streams of a compound document already extracted to a directory tree,
/// one file per stream.
#[derive(Debug, Clone)]
pub struct DirectoryStreams {
    root: PathBuf,
}

impl DirectoryStreams {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, path: &str) -> PathBuf {
        let mut file = self.root.clone();
        for segment in path.split(PATH_SEPARATOR).filter(|segment| !segment.is_empty()) {
            file.push(segment);
        }
        file
    }
}

impl StreamSource for DirectoryStreams {
    fn read_stream(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.file_path(path);
        if !file.is_file() {
            return Err(MppError::stream_not_found(path));
        }
        let data = std::fs::read(&file)?;
        trace!(path, bytes = data.len(), "read stream");
        Ok(data)
    }

    fn has_stream(&self, path: &str) -> bool {
        self.file_path(path).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_path() {
        assert_eq!(stream_path("TBkndCal", "FixedMeta"), "TBkndCal/FixedMeta");
        assert_eq!(stream_path("", "Props"), "Props");
    }

    #[test]
    fn test_memory_streams() {
        let streams = MemoryStreams::new().with_stream("TBkndCal/FixedData", vec![1, 2, 3]);
        assert!(streams.has_stream("TBkndCal/FixedData"));
        assert_eq!(streams.read_stream("TBkndCal/FixedData").unwrap(), vec![1, 2, 3]);

        let err = streams.read_stream("TBkndCal/VarMeta").unwrap_err();
        assert!(matches!(err, MppError::StreamNotFound { .. }));
    }

    #[test]
    fn test_directory_path_segments() {
        let streams = DirectoryStreams::new("/tmp/project");
        assert_eq!(
            streams.file_path("TBkndCal/Var2Data"),
            PathBuf::from("/tmp/project/TBkndCal/Var2Data")
        );
    }
}
