//! Deploy orchestrator.
//!
//! Runs one upload of a local bundle into a domain version:
//!
//! 1. **Scan**: walk the bundle and validate every key (no network yet)
//! 2. **Resolve**: pick the target version
//! 3. **Manifest**: fetch what the server already stores
//! 4. **Diff**: select the files that differ
//! 5. **Begin**: mark the version `Uploading`
//! 6. **Upload**: send the selected files with bounded concurrency
//! 7. **Finish**: mark the version `Finish` unless a file failed

use tokio::sync::mpsc;
use tracing::{info, warn};

use spa_deploy_transfer::scan_local_tree;

use crate::diff::plan_uploads;
use crate::error::DeployError;
use crate::manifest::RemoteManifest;
use crate::resolver::resolve_version;
use crate::scheduler::UploadScheduler;
use crate::status::StatusController;
use crate::store::RemoteStore;
use crate::types::{
    DeployEvent, FailedTask, RunResult, UploadOptions, UploadOutcome, UploadRequest,
};

/// Orchestrates bundle uploads.
pub struct DeployOrchestrator {
    scheduler: UploadScheduler,
    /// Closed until [`take_events`](Self::take_events) opens a channel, so
    /// unobserved events are dropped instead of buffered.
    events_tx: mpsc::UnboundedSender<DeployEvent>,
    events_taken: bool,
}

impl Default for DeployOrchestrator {
    fn default() -> Self {
        Self::new(UploadOptions::default())
    }
}

impl DeployOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(options: UploadOptions) -> Self {
        let (events_tx, _) = mpsc::unbounded_channel();
        Self {
            scheduler: UploadScheduler::new(&options),
            events_tx,
            events_taken: false,
        }
    }

    /// Takes the event receiver. Can only be called once.
    ///
    /// Only events emitted after this call are delivered.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<DeployEvent>> {
        if self.events_taken {
            return None;
        }
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.events_tx = events_tx;
        self.events_taken = true;
        Some(events_rx)
    }

    /// Uploads `request.path` into `request.domain`.
    ///
    /// Pre-flight, resolution and manifest errors abort the run. Per-file
    /// failures do not: they are collected into [`RunResult::failed`], and
    /// the version is then left `Uploading`.
    pub async fn upload(
        &self,
        store: &dyn RemoteStore,
        request: &UploadRequest,
    ) -> Result<RunResult, DeployError> {
        let domain = request.domain.as_str();

        // 1. Scan
        let files = scan_local_tree(&request.path)?;
        let scanned = files.len();
        self.emit(DeployEvent::Scanned { files: scanned });

        // 2. Resolve
        let resolved = resolve_version(store, domain, request.version).await?;
        let version = resolved.version;
        info!(domain, version, origin = ?resolved.origin, "target version resolved");
        self.emit(DeployEvent::Resolved(resolved));

        // 3. Manifest
        let manifest = RemoteManifest::fetch(store, domain, version).await?;
        self.emit(DeployEvent::ManifestFetched {
            files: manifest.len(),
        });

        // 4. Diff
        let plan = plan_uploads(&manifest, files);
        let unchanged = plan.unchanged;
        info!(
            domain,
            version,
            upload = plan.tasks.len(),
            unchanged,
            "upload plan ready"
        );
        self.emit(DeployEvent::Planned {
            upload: plan.tasks.len(),
            unchanged,
        });

        // 5. Begin
        let mut status = StatusController::new(store, domain, version);
        status.begin(&self.events_tx).await?;

        // 6. Upload
        let mut uploaded = Vec::new();
        let mut failed = Vec::new();
        if !plan.tasks.is_empty() {
            let outcomes = self
                .scheduler
                .run(store, domain, version, plan.tasks, &self.events_tx)
                .await;
            for (task, outcome) in outcomes {
                match outcome {
                    UploadOutcome::Success { .. } => uploaded.push(task.key),
                    UploadOutcome::Failed { error, .. } => failed.push(FailedTask {
                        key: task.key,
                        error,
                    }),
                }
            }
        }

        // 7. Finish
        let finished = status.finish(&failed, &self.events_tx).await?;
        if !failed.is_empty() {
            warn!(domain, version, failed = failed.len(), "upload incomplete");
        }

        Ok(RunResult {
            domain: domain.to_string(),
            resolved,
            scanned,
            unchanged,
            uploaded,
            failed,
            finished,
        })
    }

    fn emit(&self, event: DeployEvent) {
        let _ = self.events_tx.send(event);
    }
}
