//! Wire types for the SPA admin server.
//!
//! Field names and integer encodings follow the server's JSON exactly;
//! status enums travel as their numeric discriminants.

pub mod messages;
pub mod types;

pub use messages::{
    DomainVersionQuery, GetDomainQuery, ReleaseVersionRequest, RevokeVersionRequest,
    UpdateUploadingStatusRequest, UploadFileQuery,
};
pub use types::{DomainInfo, FileMetadata, PositionStatus, UploadPosition, UploadingStatus};
