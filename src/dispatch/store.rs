use std::io;
use std::path::{Component, Path, PathBuf};

use crate::dispatch::transport::Attachment;

/// Local storage for downloaded photos and filtered output.
///
/// Files are kept under `root` at the platform's relative path, so
/// `photos/file_3.jpg` lands at `<root>/photos/file_3.jpg`.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PhotoStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a downloaded attachment and returns its local path.
    pub fn save_attachment(&self, attachment: &Attachment) -> io::Result<PathBuf> {
        let relative = Path::new(&attachment.file_path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to store attachment at '{}'", attachment.file_path),
            ));
        }
        let path = self.root.join(relative);
        self.write(&path, &attachment.bytes)?;
        Ok(path)
    }

    pub fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)
    }

    pub fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
