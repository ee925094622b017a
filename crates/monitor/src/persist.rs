//! Session snapshot persistence

use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use vision_capture::VideoFrame;

/// Stores the final frame of a session under a caller-chosen name.
/// Failures are reported to the caller, which logs and moves on; persistence
/// never blocks a session from stopping.
pub trait FrameStore: Send + Sync {
    fn save(&self, frame: &VideoFrame, name: &str) -> io::Result<PathBuf>;
}

/// Writes JPEG snapshots into a directory on local disk
pub struct DiskFrameStore {
    dir: PathBuf,
}

impl DiskFrameStore {
    /// Create the store, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FrameStore for DiskFrameStore {
    fn save(&self, frame: &VideoFrame, name: &str) -> io::Result<PathBuf> {
        let jpeg = frame
            .encode_jpeg(90)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let path = self.dir.join(name);
        std::fs::write(&path, jpeg)?;
        info!(path = %path.display(), "session snapshot saved");
        Ok(path)
    }
}
