//! Target version resolution.

use tracing::debug;

use crate::error::DeployError;
use crate::store::RemoteStore;
use crate::types::{ResolvedVersion, VersionOrigin};

/// Picks the version a run uploads into.
///
/// An explicit version is used as-is. Otherwise the server's upload
/// position decides: a new domain or a new version gets the number the
/// server allocated, and an unfinished upload is resumed at its version.
pub async fn resolve_version(
    store: &dyn RemoteStore,
    domain: &str,
    explicit: Option<u32>,
) -> Result<ResolvedVersion, DeployError> {
    if let Some(version) = explicit {
        return Ok(ResolvedVersion {
            version,
            origin: VersionOrigin::Explicit,
        });
    }

    let position = store.upload_position(domain).await?;
    debug!(
        domain,
        version = position.version,
        status = ?position.status,
        path = %position.path.display(),
        "upload position"
    );

    Ok(ResolvedVersion {
        version: position.version,
        origin: position.status.into(),
    })
}
