use std::fs;
use std::path::Path;

use crate::core::error::FileFault;

/// The file operations the batch runner needs.
/// Abstracted so tests can inject read or write faults.
pub trait FileStore {
    /// Reads the whole file and decodes it as UTF-8.
    fn read_text(&self, path: &Path) -> Result<String, FileFault>;

    /// Replaces the whole file content with `content`, encoded as UTF-8.
    fn write_text(&self, path: &Path, content: &str) -> Result<(), FileFault>;
}

/// `FileStore` backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn read_text(&self, path: &Path) -> Result<String, FileFault> {
        let bytes = fs::read(path).map_err(|source| FileFault::Read {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|source| FileFault::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<(), FileFault> {
        fs::write(path, content).map_err(|source| FileFault::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
