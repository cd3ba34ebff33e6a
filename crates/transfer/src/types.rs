use std::path::PathBuf;

use crate::TransferError;
use crate::checksum::md5_file;

/// A regular file found under the bundle root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Path on disk.
    pub absolute_path: PathBuf,
    /// Root-relative key with `/` separators.
    pub key: String,
    /// Size in bytes at scan time.
    pub size: u64,
}

impl LocalFile {
    /// Reads the file and returns its MD5 hex digest.
    ///
    /// Not cached: callers hash at most once per run.
    pub fn content_hash(&self) -> Result<String, TransferError> {
        md5_file(&self.absolute_path)
    }
}
