use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// One stored file of a domain version, as listed by `GET /files/metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Domain-relative key, forward slashes only.
    pub path: String,
    /// Lowercase hex MD5 of the stored bytes.
    pub md5: String,
    pub length: u64,
}

/// Lifecycle state of a (domain, version) upload.
///
/// Serialized as its integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum UploadingStatus {
    Uploading = 0,
    Finish = 1,
}

/// Where the next upload of a domain should go, per the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum PositionStatus {
    /// The domain has never been uploaded.
    NewDomain = 0,
    /// The previous version is complete; a fresh version was allocated.
    NewVersion = 1,
    /// An upload at `version` was started but never finished.
    Uploading = 2,
}

/// Response of `GET /upload/position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPosition {
    pub path: PathBuf,
    pub version: u32,
    pub status: PositionStatus,
}

/// Response element of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub domain: String,
    pub current_version: Option<u32>,
    #[serde(default)]
    pub versions: Vec<u32>,
}
