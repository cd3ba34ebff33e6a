//! Local side of a deployment: directory walking, key normalization and
//! content digests.
//!
//! Nothing here touches the network. Every function is synchronous; the
//! deploy crate calls into it between network phases.

mod checksum;
mod scan;
mod types;
mod validation;

use std::path::PathBuf;

pub use checksum::{md5_bytes, md5_file};
pub use scan::{LocalWalk, scan_local_tree, walk_local_tree};
pub use types::LocalFile;
pub use validation::{normalize_key, validate_key};

/// Read buffer used when hashing files: 64 KiB.
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{} does not exist or is not a directory", .0.display())]
    NotFound(PathBuf),

    #[error("{} contains no files", .0.display())]
    EmptyTree(PathBuf),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
