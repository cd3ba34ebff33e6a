//! Deploy error types.

/// Errors produced during a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("local bundle error: {0}")]
    Transfer(#[from] spa_deploy_transfer::TransferError),

    #[error("admin server error: {0}")]
    Remote(#[from] spa_deploy_admin_client::Error),

    #[error("status error: {0}")]
    Status(String),

    #[error("{failed} files failed: {}", keys.join(", "))]
    Incomplete { failed: usize, keys: Vec<String> },
}

impl DeployError {
    /// Returns `true` for authentication failures, which are never retried.
    pub fn is_auth(&self) -> bool {
        matches!(self, DeployError::Remote(e) if e.is_auth())
    }
}
