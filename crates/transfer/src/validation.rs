use std::path::{Component, Path};

use crate::TransferError;

/// Derives the upload key of `path` relative to `root`.
///
/// Path components are joined with `/` regardless of the host separator.
/// The result is passed through [`validate_key`], so a file name that still
/// carries a backslash (legal on Unix) is rejected here.
pub fn normalize_key(root: &Path, path: &Path) -> Result<String, TransferError> {
    let rel = path.strip_prefix(root).map_err(|_| {
        TransferError::InvalidKey(format!(
            "{} is not under {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    TransferError::InvalidKey(format!("non UTF-8 path: {}", rel.display()))
                })?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(TransferError::InvalidKey(format!(
                    "unexpected component in {}",
                    rel.display()
                )));
            }
        }
    }

    let key = parts.join("/");
    validate_key(&key)?;
    Ok(key)
}

/// Validates that a key is portable and stays inside its domain version.
///
/// Rejects:
/// - Empty keys
/// - Keys containing a backslash
/// - Absolute keys (leading `/`)
/// - Parent directory traversal (`..` segments)
pub fn validate_key(key: &str) -> Result<(), TransferError> {
    if key.is_empty() {
        return Err(TransferError::InvalidKey("empty key".into()));
    }

    if key.contains('\\') {
        return Err(TransferError::InvalidKey(format!(
            "backslash not allowed: {key}"
        )));
    }

    if key.starts_with('/') {
        return Err(TransferError::InvalidKey(format!(
            "absolute key not allowed: {key}"
        )));
    }

    if key.split('/').any(|segment| segment == "..") {
        return Err(TransferError::InvalidKey(format!(
            "parent directory traversal not allowed: {key}"
        )));
    }

    Ok(())
}
