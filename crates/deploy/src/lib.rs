//! Bundle deploy flow: resolve, diff, upload, finish.
//!
//! This crate implements the **business logic** of pushing a built
//! single-page application to the admin server. It has no CLI or config
//! concerns; callers hand it a [`RemoteStore`] (normally the admin HTTP
//! client) and an [`UploadRequest`].
//!
//! Only files whose size or MD5 differ from the server's manifest are sent.
//! The target version is marked `Uploading` before the first file and
//! `Finish` only after every file succeeded, so a half-uploaded version is
//! never served and can be resumed by the next run.

pub mod deploy;
pub mod diff;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod scheduler;
pub mod status;
pub mod store;
pub mod types;

#[cfg(test)]
mod mock;

// Re-export primary types for convenience.
pub use deploy::DeployOrchestrator;
pub use diff::{UploadPlan, plan_uploads};
pub use error::DeployError;
pub use manifest::RemoteManifest;
pub use resolver::resolve_version;
pub use scheduler::UploadScheduler;
pub use status::StatusController;
pub use store::{RemoteStore, StoreFuture};
pub use types::{
    DEFAULT_PARALLEL, DEFAULT_RETRY, DEFAULT_RETRY_DELAY, DeployEvent, FailedTask,
    ResolvedVersion, RunResult, UploadOptions, UploadOutcome, UploadRequest, UploadTask,
    VersionOrigin,
};
