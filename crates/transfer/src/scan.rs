//! Bundle directory walking.
//!
//! Produces [`LocalFile`] entries lazily, with keys normalized to forward
//! slashes. The walk is one pass; start a new one for every run.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::TransferError;
use crate::types::LocalFile;
use crate::validation::normalize_key;

/// Lazy iterator over the regular files under a bundle root.
///
/// Directories, symlinks and other special files are skipped. Entries come
/// out in file-name order within each directory.
pub struct LocalWalk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl LocalWalk {
    /// The root this walk strips from every key.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn local_file(&self, entry: &walkdir::DirEntry) -> Result<LocalFile, TransferError> {
        let metadata = entry.metadata()?;
        let key = normalize_key(&self.root, entry.path())?;
        Ok(LocalFile {
            absolute_path: entry.path().to_path_buf(),
            key,
            size: metadata.len(),
        })
    }
}

impl Iterator for LocalWalk {
    type Item = Result<LocalFile, TransferError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            return Some(self.local_file(&entry));
        }
    }
}

/// Starts a walk of `root`.
///
/// Fails with [`TransferError::NotFound`] if `root` is missing or is not a
/// directory. Emptiness is not checked here; see [`scan_local_tree`].
pub fn walk_local_tree(root: &Path) -> Result<LocalWalk, TransferError> {
    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => {}
        _ => return Err(TransferError::NotFound(root.to_path_buf())),
    }

    Ok(LocalWalk {
        root: root.to_path_buf(),
        inner: WalkDir::new(root).sort_by_file_name().into_iter(),
    })
}

/// Walks `root` to completion and validates every key.
///
/// The first invalid key aborts the whole scan. A tree with no regular
/// files fails with [`TransferError::EmptyTree`].
pub fn scan_local_tree(root: &Path) -> Result<Vec<LocalFile>, TransferError> {
    let files = walk_local_tree(root)?.collect::<Result<Vec<_>, _>>()?;
    if files.is_empty() {
        return Err(TransferError::EmptyTree(root.to_path_buf()));
    }
    Ok(files)
}
