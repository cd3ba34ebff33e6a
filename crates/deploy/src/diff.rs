//! Local-versus-remote reconciliation.
//!
//! A local file is skipped only when the server holds a file under the same
//! key with the same size and the same MD5. Everything else is uploaded.
//! Remote files missing locally are left alone.

use spa_deploy_transfer::LocalFile;
use tracing::{debug, trace};

use crate::manifest::RemoteManifest;
use crate::types::UploadTask;

/// Files to upload plus the count of files already up to date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPlan {
    pub tasks: Vec<UploadTask>,
    pub unchanged: usize,
}

/// Compares local files against `manifest` and selects the ones to upload.
///
/// Hashing is deferred until a remote record with the same key and size is
/// found; files failing that cheaper check are selected without reading them.
pub fn plan_uploads<I>(manifest: &RemoteManifest, files: I) -> UploadPlan
where
    I: IntoIterator<Item = LocalFile>,
{
    let mut plan = UploadPlan::default();
    for file in files {
        if needs_upload(manifest, &file) {
            plan.tasks.push(UploadTask {
                key: file.key,
                absolute_path: file.absolute_path,
            });
        } else {
            trace!(key = %file.key, "unchanged");
            plan.unchanged += 1;
        }
    }
    plan
}

fn needs_upload(manifest: &RemoteManifest, file: &LocalFile) -> bool {
    let Some(remote) = manifest.get(&file.key) else {
        return true;
    };
    if remote.length != file.size {
        return true;
    }
    match file.content_hash() {
        Ok(hash) => !hash.eq_ignore_ascii_case(&remote.md5),
        Err(e) => {
            // The upload attempt will surface the read error.
            debug!(key = %file.key, error = %e, "could not hash local file");
            true
        }
    }
}
