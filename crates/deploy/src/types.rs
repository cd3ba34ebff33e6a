//! Data types for the deploy flow.

use std::path::PathBuf;
use std::time::Duration;

use spa_deploy_protocol::{PositionStatus, UploadingStatus};

use crate::error::DeployError;

/// Default number of concurrently in-flight upload attempts.
pub const DEFAULT_PARALLEL: usize = 3;

/// Default number of attempts per file.
pub const DEFAULT_RETRY: u32 = 3;

/// Default pause between two attempts of the same file.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// What to deploy and where.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Bundle root on disk.
    pub path: PathBuf,
    pub domain: String,
    /// Target version; `None` lets the server pick.
    pub version: Option<u32>,
}

/// Tuning knobs for the upload phase.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    /// Max attempts in flight across all files. Clamped to at least 1.
    pub parallel: usize,
    /// Max attempts per file. Clamped to at least 1.
    pub retry: u32,
    pub retry_delay: Duration,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            retry: DEFAULT_RETRY,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// How the target version was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrigin {
    /// Given by the caller.
    Explicit,
    /// First upload of the domain.
    NewDomain,
    /// Next version after a completed one.
    NewVersion,
    /// Continuing an unfinished upload.
    Resume,
}

impl From<PositionStatus> for VersionOrigin {
    fn from(status: PositionStatus) -> Self {
        match status {
            PositionStatus::NewDomain => VersionOrigin::NewDomain,
            PositionStatus::NewVersion => VersionOrigin::NewVersion,
            PositionStatus::Uploading => VersionOrigin::Resume,
        }
    }
}

/// The version a run uploads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: u32,
    pub origin: VersionOrigin,
}

/// One file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub key: String,
    pub absolute_path: PathBuf,
}

/// Final result of one upload task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success { attempts: u32 },
    /// `error` is the error of the last attempt.
    Failed { attempts: u32, error: String },
}

/// A file whose upload never succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTask {
    pub key: String,
    pub error: String,
}

/// Aggregate result of an upload run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub domain: String,
    pub resolved: ResolvedVersion,
    /// Regular files found locally.
    pub scanned: usize,
    /// Files skipped because the server already has identical bytes.
    pub unchanged: usize,
    pub uploaded: Vec<String>,
    pub failed: Vec<FailedTask>,
    /// Whether the version was moved to `Finish`.
    pub finished: bool,
}

impl RunResult {
    pub fn version(&self) -> u32 {
        self.resolved.version
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.finished
    }

    pub fn failed_keys(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.key.clone()).collect()
    }

    /// Converts a run with failed files into [`DeployError::Incomplete`].
    pub fn into_result(self) -> Result<RunResult, DeployError> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(DeployError::Incomplete {
                failed: self.failed.len(),
                keys: self.failed_keys(),
            })
        }
    }
}

/// Progress event emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Local bundle scanned.
    Scanned { files: usize },
    /// Target version decided.
    Resolved(ResolvedVersion),
    /// Remote manifest fetched.
    ManifestFetched { files: usize },
    /// Upload set computed.
    Planned { upload: usize, unchanged: usize },
    /// Remote version status changed.
    StatusChanged {
        version: u32,
        status: UploadingStatus,
    },
    /// One attempt failed; the file may still be retried.
    AttemptFailed {
        key: String,
        attempt: u32,
        error: String,
    },
    /// File stored on the server.
    FileUploaded { key: String },
    /// File gave up after its last attempt.
    FileFailed { key: String, error: String },
}
