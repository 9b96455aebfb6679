//! Selected video file and its preview resource
//!
//! A session owns at most one live [`PreviewHandle`]. Handles release themselves on
//! drop, so replacing the selection (or dropping the session) frees the old preview.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// A video chosen by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

impl VideoFile {
    /// Stat the file; fails if it does not exist or is not a regular file
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            file_name: file_name_of(path),
            size_bytes: metadata.len(),
        })
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}

/// Issues preview handles and counts the live ones
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<AtomicUsize>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview for `video`
    pub fn acquire(&self, video: &VideoFile) -> PreviewHandle {
        let uri = format!("preview://{}/{}", Uuid::new_v4(), video.file_name);
        self.live.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(preview = %uri, "Preview created");
        PreviewHandle {
            uri,
            live: Arc::clone(&self.live),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Live preview resource; released on drop
#[derive(Debug)]
pub struct PreviewHandle {
    uri: String,
    live: Arc<AtomicUsize>,
}

impl PreviewHandle {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(preview = %self.uri, "Preview released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(name: &str) -> VideoFile {
        VideoFile {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            size_bytes: 10,
        }
    }

    #[test]
    fn test_handle_released_on_drop() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(&video("a.mp4"));
        assert_eq!(registry.live_count(), 1);
        assert!(handle.uri().starts_with("preview://"));
        assert!(handle.uri().ends_with("/a.mp4"));
        drop(handle);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_uris_unique() {
        let registry = PreviewRegistry::new();
        let a = registry.acquire(&video("a.mp4"));
        let b = registry.acquire(&video("a.mp4"));
        assert_ne!(a.uri(), b.uri());
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn test_from_path_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, vec![0u8; 1234]).unwrap();

        let file = VideoFile::from_path(&path).unwrap();
        assert_eq!(file.file_name, "clip.mp4");
        assert_eq!(file.size_bytes, 1234);
    }

    #[test]
    fn test_from_path_rejects_directory_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VideoFile::from_path(dir.path()).is_err());
        assert!(VideoFile::from_path(dir.path().join("missing.mp4")).is_err());
    }
}
