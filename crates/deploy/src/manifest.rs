//! Remote file manifest of one domain version.

use std::collections::HashMap;

use spa_deploy_protocol::FileMetadata;

use crate::error::DeployError;
use crate::store::RemoteStore;

/// Snapshot of the files the server already stores for a domain version.
///
/// Fetched once per run and only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct RemoteManifest {
    files: HashMap<String, FileMetadata>,
}

impl RemoteManifest {
    /// Builds a manifest from the server's file list, keyed by path.
    pub fn new(files: Vec<FileMetadata>) -> Self {
        Self {
            files: files.into_iter().map(|f| (f.path.clone(), f)).collect(),
        }
    }

    /// Fetches the manifest of `domain` at `version`.
    pub async fn fetch(
        store: &dyn RemoteStore,
        domain: &str,
        version: u32,
    ) -> Result<Self, DeployError> {
        Ok(Self::new(store.file_metadata(domain, version).await?))
    }

    pub fn get(&self, key: &str) -> Option<&FileMetadata> {
        self.files.get(key)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
