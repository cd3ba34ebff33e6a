//! In-memory [`RemoteStore`] used by the unit tests of this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use spa_deploy_admin_client::Error as ClientError;
use spa_deploy_protocol::{FileMetadata, PositionStatus, UploadPosition, UploadingStatus};

use crate::error::DeployError;
use crate::store::{RemoteStore, StoreFuture};

/// A request the mock received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Position(String),
    Metadata(String, u32),
    Status(u32, UploadingStatus),
    Upload(String),
}

pub(crate) struct MockStore {
    position: Option<UploadPosition>,
    manifest: Vec<FileMetadata>,
    /// Key -> number of leading attempts that fail (`u32::MAX` = always).
    failures: Mutex<HashMap<String, u32>>,
    reject_auth: bool,
    fail_status: bool,
    delay: Duration,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self {
            position: None,
            manifest: Vec::new(),
            failures: Mutex::new(HashMap::new()),
            reject_auth: false,
            fail_status: false,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_position(mut self, version: u32, status: PositionStatus) -> Self {
        self.position = Some(UploadPosition {
            path: PathBuf::from(format!("/data/www.example.com/{version}")),
            version,
            status,
        });
        self
    }

    pub(crate) fn with_manifest(mut self, manifest: Vec<FileMetadata>) -> Self {
        self.manifest = manifest;
        self
    }

    /// Makes the first `attempts` uploads of `key` fail.
    pub(crate) fn failing(self, key: &str, attempts: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(key.to_string(), attempts);
        self
    }

    pub(crate) fn rejecting_auth(mut self) -> Self {
        self.reject_auth = true;
        self
    }

    pub(crate) fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn upload_calls(&self, key: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Upload(k) if k == key))
            .count()
    }

    pub(crate) fn status_calls(&self) -> Vec<UploadingStatus> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                Call::Status(_, s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn api_error(body: &str) -> DeployError {
        ClientError::Api {
            status: 500,
            body: body.to_string(),
        }
        .into()
    }
}

impl RemoteStore for MockStore {
    fn upload_position<'a>(&'a self, domain: &'a str) -> StoreFuture<'a, UploadPosition> {
        Box::pin(async move {
            self.record(Call::Position(domain.to_string()));
            self.position
                .clone()
                .ok_or_else(|| Self::api_error("position unavailable"))
        })
    }

    fn file_metadata<'a>(
        &'a self,
        domain: &'a str,
        version: u32,
    ) -> StoreFuture<'a, Vec<FileMetadata>> {
        Box::pin(async move {
            self.record(Call::Metadata(domain.to_string(), version));
            Ok(self.manifest.clone())
        })
    }

    fn set_uploading_status<'a>(
        &'a self,
        _domain: &'a str,
        version: u32,
        status: UploadingStatus,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Status(version, status));
            if self.fail_status {
                return Err(Self::api_error("status update refused"));
            }
            Ok(())
        })
    }

    fn upload_file<'a>(
        &'a self,
        _domain: &'a str,
        _version: u32,
        key: &'a str,
        _path: &'a Path,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Upload(key.to_string()));

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.reject_auth {
                return Err(ClientError::Unauthorized {
                    status: 401,
                    body: "bad token".into(),
                }
                .into());
            }

            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(key)
                && *remaining > 0
            {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(Self::api_error(&format!("upload of {key} failed")));
            }
            Ok(())
        })
    }
}
