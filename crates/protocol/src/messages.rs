use serde::{Deserialize, Serialize};

use crate::types::UploadingStatus;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query of `GET /status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetDomainQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Query of `GET /files/metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainVersionQuery {
    pub domain: String,
    pub version: u32,
}

/// Query of `POST /file/upload`; the file bytes travel as multipart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadFileQuery {
    pub domain: String,
    pub version: u32,
    pub path: String,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /files/upload_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUploadingStatusRequest {
    pub domain: String,
    pub version: u32,
    pub status: UploadingStatus,
}

/// Body of `POST /update_version`. `version: None` releases the latest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseVersionRequest {
    pub domain: String,
    pub version: Option<u32>,
}

/// Body of `POST /files/revoke_version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevokeVersionRequest {
    pub domain: String,
    pub version: u32,
}
