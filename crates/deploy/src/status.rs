//! Remote version lifecycle around the upload phase.
//!
//! A version is marked `Uploading` before the first file goes out and
//! `Finish` only when every file made it. A run with failures leaves the
//! version `Uploading`, which the next run resumes.

use spa_deploy_protocol::UploadingStatus;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::DeployError;
use crate::store::RemoteStore;
use crate::types::{DeployEvent, FailedTask};

/// Owns the status transitions of one (domain, version) during a run.
pub struct StatusController<'a> {
    store: &'a dyn RemoteStore,
    domain: &'a str,
    version: u32,
    state: Option<UploadingStatus>,
}

impl<'a> StatusController<'a> {
    pub fn new(store: &'a dyn RemoteStore, domain: &'a str, version: u32) -> Self {
        Self {
            store,
            domain,
            version,
            state: None,
        }
    }

    /// Last status this controller set, if any.
    pub fn state(&self) -> Option<UploadingStatus> {
        self.state
    }

    /// Marks the version `Uploading`. Must complete before any upload.
    pub async fn begin(
        &mut self,
        events_tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<(), DeployError> {
        if self.state == Some(UploadingStatus::Finish) {
            return Err(DeployError::Status(format!(
                "{}:{} is already finished",
                self.domain, self.version
            )));
        }
        self.transition(UploadingStatus::Uploading, events_tx).await
    }

    /// Marks the version `Finish` if `failed` is empty.
    ///
    /// Returns whether the version is finished. With failures nothing is
    /// sent and the version stays `Uploading`.
    pub async fn finish(
        &mut self,
        failed: &[FailedTask],
        events_tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<bool, DeployError> {
        match self.state {
            Some(UploadingStatus::Finish) => return Ok(true),
            Some(UploadingStatus::Uploading) => {}
            None => {
                return Err(DeployError::Status(format!(
                    "{}:{} was never marked uploading",
                    self.domain, self.version
                )));
            }
        }

        if !failed.is_empty() {
            info!(
                domain = self.domain,
                version = self.version,
                failed = failed.len(),
                "leaving version in uploading state"
            );
            return Ok(false);
        }

        self.transition(UploadingStatus::Finish, events_tx).await?;
        Ok(true)
    }

    async fn transition(
        &mut self,
        status: UploadingStatus,
        events_tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<(), DeployError> {
        self.store
            .set_uploading_status(self.domain, self.version, status)
            .await?;
        self.state = Some(status);
        info!(domain = self.domain, version = self.version, status = ?status, "status changed");
        let _ = events_tx.send(DeployEvent::StatusChanged {
            version: self.version,
            status,
        });
        Ok(())
    }
}
